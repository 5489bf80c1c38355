mod instrumentation;

use {
    crate::AlloyProvider,
    alloy::{
        network::{EthereumWallet, TxSigner},
        primitives::Signature,
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    instrumentation::{InstrumentationLayer, LabelingLayer},
    url::Url,
};

/// Creates a provider that signs every transaction it sends with `signer`.
///
/// Nonce, gas, fees and chain id of outgoing transactions are filled by
/// alloy's recommended fillers unless the caller already set them.
pub fn provider_with_signer<S>(url: &Url, label: &str, signer: S) -> AlloyProvider
where
    S: TxSigner<Signature> + Send + Sync + 'static,
{
    let rpc = ClientBuilder::default()
        .layer(LabelingLayer {
            label: label.into(),
        })
        .layer(InstrumentationLayer)
        .http(url.clone());
    let wallet = EthereumWallet::new(signer);

    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased()
}
