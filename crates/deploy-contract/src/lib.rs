pub mod arguments;
pub mod artifact;
pub mod deploy;
pub mod error;
pub mod key;

pub use error::Error;
use {
    crate::{
        arguments::Arguments,
        artifact::Artifact,
        deploy::{Deployer, Deployment, PendingDeployment, RpcNode},
    },
    alloy::signers::Signer,
    clap::Parser,
    std::{io::Write, process::ExitCode},
};

/// Label attached to every RPC request the deployer sends.
const RPC_LABEL: &str = "deployer";

pub async fn start(args: impl Iterator<Item = String>) -> ExitCode {
    let args = Arguments::parse_from(args);
    let obs_config = observe::Config::new(
        args.logging.log_filter.as_str(),
        args.logging.use_json_logs,
    );
    observe::tracing::initialize(&obs_config);
    observe::panic_hook::install();
    tracing::info!("running deploy-contract with validated arguments:\n{}", args);

    exit_code(&run(args, &mut std::io::stdout()).await)
}

/// Maps the outcome of a deployment to the process exit status. A failure is
/// logged as a single line starting with its category.
fn exit_code(result: &Result<Deployment, Error>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "deployment failed");
            ExitCode::FAILURE
        }
    }
}

/// Deploys the contract described by `args` and writes the contract address
/// and deployment transaction hash to `out` as soon as the node accepted the
/// transaction. Returns once the deployment is confirmed.
///
/// The key and the artifact are fully loaded and validated before the first
/// request is sent to the node.
pub async fn run(args: Arguments, out: &mut impl Write) -> Result<Deployment, Error> {
    let raw_key = args.key_source()?.read()?;
    let artifact = Artifact::load(&args.artifact)?;
    let code = artifact.creation_code(&args.constructor_args)?;
    let signer = raw_key.signer()?;
    let sender = signer.address();
    tracing::info!(
        %sender,
        artifact = %args.artifact.display(),
        code_size = code.len(),
        "deploying contract"
    );

    let provider = ethrpc::alloy::provider_with_signer(&args.node_url, RPC_LABEL, signer);
    let deployer = Deployer::new(RpcNode::new(provider, sender), args.confirmations);

    let pending = deployer.submit(code).await?;
    report(out, &pending).map_err(Error::Output)?;
    deployer.confirm(&pending).await
}

/// Writes the two report lines: the contract address followed by the hash of
/// the deployment transaction.
pub fn report(out: &mut impl Write, pending: &PendingDeployment) -> std::io::Result<()> {
    writeln!(out, "contractAddress= {}", pending.address)?;
    writeln!(out, "deploy txHash= {}", pending.tx_hash)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{address, b256},
        serde_json::json,
        std::path::Path,
    };

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    // Nothing listens on port 1, connections are refused right away.
    const UNREACHABLE_NODE: &str = "http://127.0.0.1:1";

    fn write_artifact(dir: &Path, contents: &str) -> String {
        let path = dir.join("EventValue.json");
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_owned()
    }

    fn valid_artifact() -> String {
        json!({
            "abi": [{
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [{ "name": "_value", "type": "uint256" }]
            }],
            "bytecode": "0x600080f3"
        })
        .to_string()
    }

    fn args(artifact: &str, key: &str) -> Arguments {
        Arguments::try_parse_from([
            "deploy-contract",
            "--node-url",
            UNREACHABLE_NODE,
            "--artifact",
            artifact,
            "--private-key",
            key,
        ])
        .unwrap()
    }

    #[test]
    fn only_confirmed_deployment_exits_successfully() {
        let deployment = Deployment {
            address: address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            tx_hash: b256!("0x3b3a8e7c4d9f2e1a0b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a"),
            block_number: Some(1),
            gas_used: 53_000,
        };
        assert_eq!(exit_code(&Ok(deployment)), ExitCode::SUCCESS);

        let reverted = Error::Network(anyhow::anyhow!("deployment transaction reverted"));
        assert_eq!(exit_code(&Err(reverted)), ExitCode::FAILURE);
    }

    #[test]
    fn network_error_is_one_line() {
        let err = Error::Network(
            anyhow::anyhow!("connection refused")
                .context("error sending request")
                .context("failed to fetch sender nonce"),
        );
        let line = err.to_string();
        assert!(!line.contains('\n'), "{line}");
        assert!(line.starts_with("network error: "), "{line}");
        assert!(line.contains("connection refused"), "{line}");
    }

    #[test]
    fn report_prints_address_then_hash() {
        let pending = PendingDeployment {
            address: address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            tx_hash: b256!("0x3b3a8e7c4d9f2e1a0b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a"),
            nonce: 0,
        };
        let mut out = Vec::new();
        report(&mut out, &pending).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "contractAddress= 0x5FbDB2315678afecb367f032d93F642f64180aa3\ndeploy txHash= \
             0x3b3a8e7c4d9f2e1a0b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a\n"
        );
    }

    #[tokio::test]
    async fn missing_artifact_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("EventValue.json");
        let mut out = Vec::new();

        let err = run(args(artifact.to_str().unwrap(), KEY), &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::File { .. }));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn malformed_artifact_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_artifact(dir.path(), r#"{ "abi": [], "bytec"#);
        let mut out = Vec::new();

        // The node is unreachable so reaching it would yield a network error.
        let err = run(args(&artifact, KEY), &mut out).await.unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn invalid_key_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_artifact(dir.path(), &valid_artifact());
        let mut out = Vec::new();

        let err = run(args(&artifact, "0x403d...23d5"), &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Key(_)));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn unreachable_node_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_artifact(dir.path(), &valid_artifact());
        let mut out = Vec::new();

        let err = run(args(&artifact, KEY), &mut out).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert!(out.is_empty());
    }
}
