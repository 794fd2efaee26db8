// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Procflow CLI entrypoint.
//!
//! `serve` speaks the host protocol over stdio, one JSON message per line. Logs go to stderr so
//! they never interleave with protocol output.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use procflow::config::EditorConfig;
use procflow::host::{message_schemas, FileIdentity, HostSession, InboundMessage, OutboundMessage};
use procflow::model::document_schema;
use procflow::pipeline::{normalize, serialize, to_pretty_json};
use procflow::store::{ProcessFile, ProcessStore, WriteDurability};

const LOG_ENV: &str = "PROCFLOW_LOG";
const DEFAULT_LOG_FILTER: &str = "procflow=info";

#[derive(Debug, Parser)]
#[command(name = "procflow", version, about = "Process flowchart document core")]
struct Cli {
    /// Editor configuration (TOML). Built-in defaults apply when omitted.
    #[arg(long, global = true, env = "PROCFLOW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Run the host synchronization protocol over stdin/stdout.
    Serve,
    /// Normalize a process file the way the editor would load it.
    Normalize {
        file: PathBuf,
        /// Workspace root used to derive the host-relative path.
        #[arg(long)]
        workspace: Option<PathBuf>,
        /// Rewrite the file in place instead of printing.
        #[arg(long)]
        write: bool,
        /// Flush the rewritten file to stable storage where supported.
        #[arg(long, requires = "write")]
        durable_writes: bool,
    },
    /// Print the JSON schema of the process document.
    Schema {
        /// Print the host message envelopes instead.
        #[arg(long)]
        messages: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Command::Serve => serve(config),
        Command::Normalize {
            file,
            workspace,
            write,
            durable_writes,
        } => normalize_file(&config, &file, workspace.as_deref(), write, durable_writes),
        Command::Schema { messages } => print_schema(messages),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn serve(config: EditorConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<InboundMessage>();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let reader = tokio::spawn(read_host_messages(
            BufReader::new(tokio::io::stdin()),
            inbound_tx,
        ));

        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(message) = outbound_rx.recv().await {
                let mut line = serde_json::to_vec(&message)?;
                line.push(b'\n');
                stdout.write_all(&line).await?;
                stdout.flush().await?;
            }
            Ok::<(), anyhow::Error>(())
        });

        info!("waiting for host");
        let mut session = HostSession::new(config, outbound_tx);
        session.run(inbound_rx).await;
        drop(session);

        reader.await?.context("reading host messages")?;
        writer.await?.context("writing host messages")?;
        Ok::<(), anyhow::Error>(())
    })
}

/// Forwards one host message per line until the input ends or the session hangs up.
///
/// Lines that are not valid UTF-8 or not a known message are logged and skipped.
async fn read_host_messages<R>(
    reader: R,
    inbound: mpsc::UnboundedSender<InboundMessage>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.split(b'\n');
    while let Some(line) = lines.next_segment().await? {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<InboundMessage>(&line) {
            Ok(message) => {
                if inbound.send(message).is_err() {
                    break;
                }
            }
            Err(err) => warn!(error = %err, "ignoring unreadable host message"),
        }
    }
    Ok(())
}

fn normalize_file(
    config: &EditorConfig,
    file: &Path,
    workspace: Option<&Path>,
    write: bool,
    durable_writes: bool,
) -> anyhow::Result<()> {
    let durability = if durable_writes {
        WriteDurability::Durable
    } else {
        WriteDurability::BestEffort
    };
    let process_file = ProcessFile::new(file).with_durability(durability);
    let mut doc = process_file.read()?;

    let absolute = std::fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
    let workspace =
        workspace.map(|root| std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf()));
    FileIdentity::from_path(&absolute, workspace.as_deref(), config).apply_to(&mut doc, config);

    let mut store = ProcessStore::new(&config.defaults);
    let loaded = normalize(doc, &config.defaults, store.ids());
    store.load(loaded);
    let normalized = serialize(&store);

    if write {
        process_file.write(&normalized)?;
        info!(path = %file.display(), "normalized process file");
    } else {
        println!("{}", to_pretty_json(&normalized)?);
    }
    Ok(())
}

fn print_schema(messages: bool) -> anyhow::Result<()> {
    let text = if messages {
        let mut schemas = serde_json::Map::new();
        for (name, schema) in message_schemas() {
            schemas.insert(name.to_owned(), serde_json::to_value(schema)?);
        }
        serde_json::to_string_pretty(&schemas)?
    } else {
        serde_json::to_string_pretty(&document_schema())?
    };
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use procflow::host::InboundMessage;
    use tokio::sync::mpsc;

    use super::{read_host_messages, Cli, Command};

    #[tokio::test]
    async fn undecodable_lines_do_not_end_the_session() {
        let input: &[u8] = b"\xff\xfe\n\n{\"type\":\"loadBreakpoints\",\"breakpoints\":[\"n1\"]}\n";
        let (tx, mut rx) = mpsc::unbounded_channel();

        read_host_messages(input, tx).await.expect("read");

        assert_eq!(
            rx.recv().await,
            Some(InboundMessage::LoadBreakpoints {
                breakpoints: vec!["n1".to_owned()],
            })
        );
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn parses_serve() {
        let cli = Cli::try_parse_from(["procflow", "serve"]).expect("parse");
        assert_eq!(cli.command, Command::Serve);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn parses_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["procflow", "serve", "--config", "editor.toml"])
            .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("editor.toml")));
    }

    #[test]
    fn parses_normalize_flags() {
        let cli = Cli::try_parse_from([
            "procflow",
            "normalize",
            "orders.flowchartprocess.json",
            "--workspace",
            "shop",
            "--write",
            "--durable-writes",
        ])
        .expect("parse");
        assert_eq!(
            cli.command,
            Command::Normalize {
                file: PathBuf::from("orders.flowchartprocess.json"),
                workspace: Some(PathBuf::from("shop")),
                write: true,
                durable_writes: true,
            }
        );
    }

    #[test]
    fn durable_writes_requires_write() {
        Cli::try_parse_from(["procflow", "normalize", "a.json", "--durable-writes"]).unwrap_err();
    }

    #[test]
    fn parses_schema_messages() {
        let cli = Cli::try_parse_from(["procflow", "schema", "--messages"]).expect("parse");
        assert_eq!(cli.command, Command::Schema { messages: true });
    }

    #[test]
    fn rejects_missing_subcommand() {
        Cli::try_parse_from(["procflow"]).unwrap_err();
    }
}
