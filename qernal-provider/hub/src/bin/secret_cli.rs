// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use anyhow::{bail, Context, Result};
use clap::{command, Args, Parser, Subcommand};
use log::debug;
use qernal_client::Dek;
use qernal_provider::{
    secret::{
        layout::{
            certificate::CertificateSecret, environment::EnvironmentSecret,
            registry::RegistrySecret,
        },
        SealedSecret, SecretSpec, SecretValue,
    },
    Hub, ProviderConfig,
};
use serde::Serialize;
use serde_json::json;
use tokio::fs;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "secret")]
#[command(bin_name = "secret")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    operation: Operation,

    /// path of the provider configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Operation {
    /// Seal a value offline against a given DEK public key
    Seal(SealArgs),

    /// Print the current DEK of a project
    Dek(ProjectArgs),

    /// Seal a value and create a secret with it
    Create(WriteArgs),

    /// Seal a value and replace the value of an existing secret
    Update(WriteArgs),

    /// Print the metadata of a secret
    Get(SecretArgs),

    /// Delete a secret
    Delete(SecretArgs),
}

#[derive(Args)]
struct SealArgs {
    /// base64 encoded DEK public key
    #[arg(short, long)]
    public_key: String,

    /// revision of the DEK
    #[arg(short, long)]
    revision: u64,

    #[command(flatten)]
    plaintext: PlaintextArgs,
}

#[derive(Args)]
struct ProjectArgs {
    /// id of the project
    #[arg(short, long)]
    project_id: String,
}

#[derive(Args)]
struct SecretArgs {
    /// id of the project
    #[arg(short, long)]
    project_id: String,

    /// name of the secret
    #[arg(short, long)]
    name: String,
}

#[derive(Args)]
struct WriteArgs {
    /// Type of the secret, i.e. `environment`, `certificate` or `registry`
    #[command(subcommand)]
    r#type: TypeArgs,
}

#[derive(Subcommand)]
enum TypeArgs {
    /// Environment variable
    Environment(EnvironmentArgs),

    /// TLS certificate, the value is its private key
    Certificate(CertificateArgs),

    /// Container registry credentials, the value is the access token
    Registry(RegistryArgs),
}

#[derive(Args)]
struct EnvironmentArgs {
    #[command(flatten)]
    secret: SecretArgs,

    #[command(flatten)]
    value: ValueArgs,
}

#[derive(Args)]
struct CertificateArgs {
    #[command(flatten)]
    secret: SecretArgs,

    /// path of the PEM encoded public certificate
    #[arg(long)]
    certificate_file: String,

    #[command(flatten)]
    value: ValueArgs,
}

#[derive(Args)]
struct RegistryArgs {
    #[command(flatten)]
    secret: SecretArgs,

    /// url of the registry, e.g. `ghcr.io`
    #[arg(long)]
    registry_url: String,

    #[command(flatten)]
    value: ValueArgs,
}

#[derive(Args)]
struct PlaintextArgs {
    /// plaintext value
    #[arg(long, conflicts_with = "value_file")]
    value: Option<String>,

    /// path of the file which contains the plaintext value
    #[arg(long)]
    value_file: Option<String>,
}

#[derive(Args)]
struct ValueArgs {
    #[command(flatten)]
    plaintext: PlaintextArgs,

    /// base64 encoded sealed box, sealed elsewhere
    #[arg(long)]
    encrypted_value: Option<String>,

    /// DEK revision of `encrypted_value`, either `N` or `keys/dek/N`
    #[arg(long)]
    encrypted_revision: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.operation {
        Operation::Seal(args) => seal(args).await,
        Operation::Dek(args) => {
            let hub = connect(cli.config).await?;
            let dek = hub.fetch_dek(&args.project_id).await?;
            print_json(&json!({
                "project_id": args.project_id,
                "public_key": dek.public_key,
                "revision": dek.revision,
            }))
        }
        Operation::Create(args) => {
            let (project_id, spec) = secret_spec(args).await?;
            let hub = connect(cli.config).await?;
            let state = hub.create_secret(&project_id, &spec).await?;
            print_json(&state)
        }
        Operation::Update(args) => {
            let (project_id, spec) = secret_spec(args).await?;
            let hub = connect(cli.config).await?;
            let state = hub.update_secret(&project_id, &spec).await?;
            print_json(&state)
        }
        Operation::Get(args) => {
            let hub = connect(cli.config).await?;
            let state = hub.read_secret(&args.project_id, &args.name).await?;
            print_json(&state)
        }
        Operation::Delete(args) => {
            let hub = connect(cli.config).await?;
            hub.delete_secret(&args.project_id, &args.name).await?;
            print_json(&json!({
                "project_id": args.project_id,
                "name": args.name,
                "deleted": true,
            }))
        }
    }
}

async fn connect(config_path: Option<String>) -> Result<Hub> {
    let config = ProviderConfig::new(config_path)?;
    debug!("provider config: {config:?}");
    Ok(Hub::from_config(&config).await?)
}

async fn seal(args: SealArgs) -> Result<()> {
    let plaintext = read_plaintext(args.plaintext)
        .await?
        .context("either --value or --value-file must be given")?;

    let dek = Dek {
        public_key: args.public_key,
        revision: args.revision,
    };
    let sealed = SealedSecret::seal(&dek, plaintext.as_bytes()).context("seal value failed")?;
    print_json(&sealed)
}

async fn read_plaintext(args: PlaintextArgs) -> Result<Option<Zeroizing<String>>> {
    match (args.value, args.value_file) {
        (Some(value), None) => Ok(Some(Zeroizing::new(value))),
        (None, Some(path)) => {
            let value = fs::read_to_string(&path)
                .await
                .with_context(|| format!("read value file {path} failed"))?;
            Ok(Some(Zeroizing::new(value)))
        }
        (None, None) => Ok(None),
        (Some(_), Some(_)) => bail!("--value and --value-file cannot be used together"),
    }
}

async fn secret_value(args: ValueArgs) -> Result<SecretValue> {
    let plaintext = read_plaintext(args.plaintext)
        .await?
        .map(|p| p.as_str().to_string());
    Ok(SecretValue::from_inputs(
        plaintext,
        args.encrypted_value,
        args.encrypted_revision,
    )?)
}

async fn secret_spec(args: WriteArgs) -> Result<(String, SecretSpec)> {
    let (project_id, spec) = match args.r#type {
        TypeArgs::Environment(args) => (
            args.secret.project_id,
            SecretSpec::Environment(EnvironmentSecret {
                name: args.secret.name,
                value: secret_value(args.value).await?,
            }),
        ),
        TypeArgs::Certificate(args) => {
            let certificate = fs::read_to_string(&args.certificate_file)
                .await
                .with_context(|| {
                    format!("read certificate file {} failed", args.certificate_file)
                })?;
            (
                args.secret.project_id,
                SecretSpec::Certificate(CertificateSecret {
                    name: args.secret.name,
                    certificate,
                    value: secret_value(args.value).await?,
                }),
            )
        }
        TypeArgs::Registry(args) => (
            args.secret.project_id,
            SecretSpec::Registry(RegistrySecret {
                name: args.secret.name,
                registry_url: args.registry_url,
                value: secret_value(args.value).await?,
            }),
        ),
    };

    Ok((project_id, spec))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("serialize output failed")?;
    println!("{output}");
    Ok(())
}
