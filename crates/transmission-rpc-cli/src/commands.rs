//! Command execution on top of the RPC client.

use std::future::Future;

use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info};
use transmission_rpc_client::{
    Arguments, ConfigError, HttpTransport, RpcClient, RpcError, TransmissionApi,
};
use transmission_rpc_types::{
    TorrentIdList,
    args::{free_space, session, torrent_add},
};

use crate::cli::Command;

/// Errors reported by the binary.
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// The client could not be configured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The RPC call failed.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The result could not be printed.
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Runs `call` with an empty session id, then once more with the fresh id if the daemon asked for
/// one. A second [`RpcError::InvalidSession`] is returned as is.
pub(crate) async fn with_session<F, Fut, R>(mut call: F) -> Result<R, RpcError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<R, RpcError>>,
{
    match call(String::new()).await {
        Err(RpcError::InvalidSession { session_id }) => {
            debug!("Retrying with session id {session_id}");
            call(session_id).await
        }
        other => other,
    }
}

/// Runs `command` and returns what should be printed, if anything.
pub(crate) async fn run<T: HttpTransport>(
    client: &RpcClient<T>,
    command: &Command,
) -> Result<Option<Value>, CliError> {
    let output = with_session(move |session_id| execute(client, command, session_id)).await?;
    Ok(output)
}

async fn execute<T: HttpTransport>(
    client: &RpcClient<T>,
    command: &Command,
    session_id: String,
) -> Result<Option<Value>, RpcError> {
    let session_id = session_id.as_str();
    let output = match command {
        Command::SessionGet => Value::Object(client.session_get(session_id).await?),
        Command::SessionStats => Value::Object(client.session_stats(session_id).await?),
        Command::List { ids, fields } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let torrents = client
                .torrent_get(session_id, &id_list(ids), &fields)
                .await?;
            Value::Array(torrents.into_iter().map(Value::Object).collect())
        }
        Command::Add {
            filename,
            download_dir,
            paused,
        } => {
            let mut arguments = Arguments::new();
            arguments.insert(torrent_add::FILENAME.into(), filename.as_str().into());
            if let Some(download_dir) = download_dir {
                arguments.insert(torrent_add::DOWNLOAD_DIR.into(), download_dir.as_str().into());
            }
            if *paused {
                arguments.insert(torrent_add::PAUSED.into(), true.into());
            }
            let added = client.torrent_add(session_id, arguments).await?;
            info!("Added torrent {} ({})", added.name, added.id);
            json!(added)
        }
        Command::Start { ids } => {
            client.torrent_start(session_id, &id_list(ids)).await?;
            return Ok(None);
        }
        Command::Stop { ids } => {
            client.torrent_stop(session_id, &id_list(ids)).await?;
            return Ok(None);
        }
        Command::Remove {
            ids,
            delete_local_data,
        } => {
            client
                .torrent_remove(session_id, &id_list(ids), *delete_local_data)
                .await?;
            return Ok(None);
        }
        Command::PortTest => {
            json!({ session::PORT_IS_OPEN: client.port_test(session_id).await? })
        }
        Command::FreeSpace { path } => {
            let space = client.free_space(session_id, path).await?;
            json!({ free_space::PATH: space.path, free_space::SIZE_BYTES: space.size_bytes })
        }
        Command::BlocklistUpdate => {
            json!({ session::BLOCKLIST_SIZE: client.blocklist_update(session_id).await? })
        }
    };
    Ok(Some(output))
}

fn id_list(ids: &[u64]) -> TorrentIdList {
    TorrentIdList::new(ids.iter().copied())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use httpmock::prelude::*;
    use transmission_rpc_client::RpcConfig;

    use super::*;

    fn invalid_session(session_id: &str) -> RpcError {
        RpcError::InvalidSession {
            session_id: session_id.into(),
        }
    }

    #[tokio::test]
    async fn retries_once_with_the_fresh_id() {
        let calls = AtomicUsize::new(0);
        let result = with_session(|session_id| {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                match call {
                    0 => {
                        assert!(session_id.is_empty());
                        Err(invalid_session("abc123"))
                    }
                    _ => Ok(session_id),
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "abc123");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_invalid_session_is_an_error() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_session(|_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(invalid_session("abc123")) }
        })
        .await;

        assert!(matches!(result, Err(RpcError::InvalidSession { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_session(|_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(RpcError::Remote {
                    result: "no such torrent".into(),
                    arguments: Value::Null,
                })
            }
        })
        .await;

        assert!(matches!(result, Err(RpcError::Remote { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn port_test_prints_reachability() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/transmission/rpc")
                .json_body(json!({"method": "port-test"}));
            then.status(200)
                .json_body(json!({"result": "success", "arguments": {"port-is-open": true}}));
        });

        let config = RpcConfig::new(&server.url("/transmission/rpc")).unwrap();
        let client = RpcClient::try_new(config).unwrap();
        let output = run(&client, &Command::PortTest).await.unwrap();

        assert_eq!(output, Some(json!({"port-is-open": true})));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn stop_prints_nothing() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/transmission/rpc").json_body(json!({
                "method": "torrent-stop",
                "arguments": {"ids": [42, 1337]}
            }));
            then.status(200).json_body(json!({"result": "success"}));
        });

        let config = RpcConfig::new(&server.url("/transmission/rpc")).unwrap();
        let client = RpcClient::try_new(config).unwrap();
        let output = run(&client, &Command::Stop { ids: vec![42, 1337] })
            .await
            .unwrap();

        assert_eq!(output, None);
        mock.assert_async().await;
    }
}
