/// Address derivation for script pubkeys.
///
/// Legacy p2pkh and p2sh addresses use Base58Check with a network version
/// byte. Segwit v0 addresses (p2wpkh, p2wsh) use bech32 with the `bc` or
/// `tb` prefix.

use std::fmt;

use btc_primitives::base58::{h160_to_p2pkh_address, h160_to_p2sh_address};
use btc_primitives::bech32::encode_segwit_address;
use btc_primitives::hash::{hash160, sha256};

use crate::script::{p2sh_script, p2wsh_script};
use crate::{Script, ScriptError};

/// Bitcoin network type for address prefix selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Network {
    /// Bitcoin mainnet (`1`/`3` legacy prefixes, `bc` bech32).
    #[default]
    Mainnet,
    /// Bitcoin testnet (`m`/`n`/`2` legacy prefixes, `tb` bech32).
    Testnet,
}

impl Network {
    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Testnet)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl Script {
    /// Base58Check address of a p2pkh or p2sh script pubkey.
    ///
    /// # Returns
    /// The address, or `ScriptError::UnknownScriptPubKey` for any other
    /// shape. Segwit programs go through `segwit_address`.
    pub fn address(&self, network: Network) -> Result<String, ScriptError> {
        let testnet = network.is_testnet();
        if let Some(h160) = self.hash160() {
            if self.is_p2pkh_script_pubkey() {
                return Ok(h160_to_p2pkh_address(&h160, testnet));
            }
            return Ok(h160_to_p2sh_address(&h160, testnet));
        }
        Err(ScriptError::UnknownScriptPubKey(self.to_string()))
    }

    /// Bech32 address of a p2wpkh or p2wsh script pubkey.
    pub fn segwit_address(&self, network: Network) -> Result<String, ScriptError> {
        if !self.is_p2wpkh_script_pubkey() && !self.is_p2wsh_script_pubkey() {
            return Err(ScriptError::UnknownScriptPubKey(self.to_string()));
        }
        Ok(encode_segwit_address(&self.raw_serialize()?, network.is_testnet())?)
    }

    /// Address that pays to this script as a p2sh redeem script.
    pub fn p2sh_address(&self, network: Network) -> Result<String, ScriptError> {
        let h160 = hash160(&self.raw_serialize()?);
        p2sh_script(&h160).address(network)
    }

    /// The p2wsh script pubkey committing to this script as a witness script.
    pub fn p2wsh_script_pubkey(&self) -> Result<Script, ScriptError> {
        Ok(p2wsh_script(&sha256(&self.raw_serialize()?)))
    }

    /// Bech32 address that pays to this script as a witness script.
    pub fn p2wsh_address(&self, network: Network) -> Result<String, ScriptError> {
        self.p2wsh_script_pubkey()?.segwit_address(network)
    }

    /// P2SH address wrapping the p2wsh script pubkey of this script.
    pub fn p2sh_p2wsh_address(&self, network: Network) -> Result<String, ScriptError> {
        self.p2wsh_script_pubkey()?.p2sh_address(network)
    }
}
