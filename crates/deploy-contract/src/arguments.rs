use {
    crate::{error::KeyError, key::KeySource},
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    url::Url,
};

#[derive(clap::Parser)]
#[clap(group(
    clap::ArgGroup::new("key")
        .required(true)
        .args(["private_key", "private_key_file"])
))]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Path to the build artifact of the contract to deploy. The file must be
    /// JSON with an `abi` and a `bytecode` field.
    #[clap(long, env, default_value = "./build/contracts/EventValue.json")]
    pub artifact: PathBuf,

    /// Hex encoded private key of the deploying account.
    #[clap(long, env, hide_env_values = true)]
    pub private_key: Option<String>,

    /// File containing the hex encoded private key of the deploying account,
    /// e.g. `.secret`. Surrounding whitespace is ignored.
    #[clap(long, env)]
    pub private_key_file: Option<PathBuf>,

    /// Constructor arguments, one value per argument, e.g.
    /// `--constructor-args 100 "a, b" "[1,2]"`. Each one is parsed as the type
    /// the ABI declares for the constructor input at the same position. Pass
    /// the flag without a value for contracts without constructor arguments.
    /// The environment variable holds a single argument.
    #[clap(
        long,
        env,
        default_value = "100",
        num_args = 0..,
        allow_negative_numbers = true
    )]
    pub constructor_args: Vec<String>,

    /// Number of blocks, including the one the deployment is mined in, to
    /// wait for before the deployment counts as confirmed.
    #[clap(
        long,
        env,
        default_value = "1",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub confirmations: u64,
}

impl Arguments {
    pub fn key_source(&self) -> Result<KeySource, KeyError> {
        match (&self.private_key, &self.private_key_file) {
            (Some(key), _) => Ok(KeySource::Literal(key.clone())),
            (None, Some(path)) => Ok(KeySource::File(path.clone())),
            (None, None) => Err(KeyError::Missing),
        }
    }
}

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,deploy_contract=info,ethrpc=info")]
    pub log_filter: String,

    /// Whether to use JSON format for the logs.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,
}

impl Display for LoggingArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            use_json_logs,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            logging,
            node_url,
            artifact,
            private_key,
            private_key_file,
            constructor_args,
            confirmations,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "artifact: {}", artifact.display())?;
        display_secret_option(f, "private_key", private_key)?;
        display_option(
            f,
            "private_key_file",
            &private_key_file.as_ref().map(|path| path.display()),
        )?;
        writeln!(f, "constructor_args: {constructor_args:?}")?;
        writeln!(f, "confirmations: {confirmations}")?;
        Ok(())
    }
}

fn display_secret_option<T>(f: &mut Formatter<'_>, name: &str, option: &Option<T>) -> fmt::Result {
    display_option(f, name, &option.as_ref().map(|_| "SECRET"))
}

fn display_option(f: &mut Formatter<'_>, name: &str, option: &Option<impl Display>) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}
