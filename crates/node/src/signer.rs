//! Wallet loading.

use std::fs;

use eyre::{Result, WrapErr, bail};
use vigil_ledger::LocalPayloadSigner;

use crate::config::WalletConfig;

/// Load the vote signer from the wallet configuration.
///
/// A keystore needs a password file. A raw private key is used as is.
pub fn load_signer(wallet: &WalletConfig) -> Result<LocalPayloadSigner> {
    match (&wallet.keystore, &wallet.private_key) {
        (Some(_), Some(_)) => bail!("Configure either a keystore or a private key, not both"),
        (Some(keystore), None) => {
            let Some(password_file) = &wallet.password_file else {
                bail!("Keystore {} needs a password file", keystore.display());
            };
            let password = fs::read_to_string(password_file).wrap_err_with(|| {
                format!("Failed to read password file {}", password_file.display())
            })?;
            let signer = LocalPayloadSigner::from_keystore(keystore, password.trim_end())?;
            tracing::info!(address = %signer.signer_address(), "loaded wallet from keystore");
            Ok(signer)
        }
        (None, Some(key)) => {
            let signer = LocalPayloadSigner::from_hex(key.trim())?;
            tracing::info!(address = %signer.signer_address(), "loaded wallet from private key");
            Ok(signer)
        }
        (None, None) => bail!("No wallet configured; set a keystore or a private key"),
    }
}

#[cfg(test)]
mod tests {
    use alloy_signer_local::LocalSigner;
    use tempfile::TempDir;

    use super::*;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_private_key_wallet() {
        let signer = load_signer(&WalletConfig {
            private_key: Some(format!("{KEY}\n")),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            signer.signer_address(),
            LocalPayloadSigner::from_hex(KEY).unwrap().signer_address()
        );
    }

    #[test]
    fn test_keystore_wallet() {
        let dir = TempDir::new().unwrap();
        let key = hex::decode(KEY.trim_start_matches("0x")).unwrap();
        let mut rng = rand_08::thread_rng();
        let (expected, _uuid) =
            LocalSigner::encrypt_keystore(dir.path(), &mut rng, key, "hunter2", Some("wallet"))
                .unwrap();

        let password_file = dir.path().join("password");
        fs::write(&password_file, "hunter2\n").unwrap();

        let signer = load_signer(&WalletConfig {
            keystore: Some(dir.path().join("wallet")),
            password_file: Some(password_file),
            private_key: None,
        })
        .unwrap();
        assert_eq!(signer.signer_address(), expected.address());
    }

    #[test]
    fn test_keystore_without_password_file() {
        let err = load_signer(&WalletConfig {
            keystore: Some("wallet.json".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("password file"));
    }

    #[test]
    fn test_conflicting_wallet_sources() {
        let result = load_signer(&WalletConfig {
            keystore: Some("wallet.json".into()),
            private_key: Some(KEY.to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_no_wallet() {
        assert!(load_signer(&WalletConfig::default()).is_err());
    }
}
