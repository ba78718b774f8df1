//! Per-method wrappers over the session engine.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use transmission_rpc_types::{
    AddedTorrent, ArgumentSpec, FreeSpace, RenamedPath, RpcMethod, TorrentIdList, ValueKind,
    args::{
        self, IDS, free_space, session, torrent_add, torrent_get, torrent_remove,
        torrent_rename_path, torrent_set, torrent_set_location,
    },
};

use crate::client::RpcClient;
use crate::codec::Arguments;
use crate::error::RpcError;
use crate::transport::HttpTransport;

/// Prefix of the `blocklist-update` result when the blocklist URL answers 404.
const BLOCKLIST_NOT_FOUND: &str = "gotNewBlocklist: http error 404";

/// The Transmission RPC API, one method per daemon operation.
///
/// Every method takes the session token first. An empty [`TorrentIdList`] targets all torrents.
#[allow(async_fn_in_trait)]
pub trait TransmissionApi {
    /// Starts the given torrents.
    async fn torrent_start(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError>;
    /// Starts the given torrents, bypassing the queue.
    async fn torrent_start_now(&self, session_id: &str, ids: &TorrentIdList)
    -> Result<(), RpcError>;
    /// Stops the given torrents.
    async fn torrent_stop(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError>;
    /// Verifies the given torrents.
    async fn torrent_verify(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError>;
    /// Reannounces the given torrents.
    async fn torrent_reannounce(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
    ) -> Result<(), RpcError>;
    /// Applies `arguments` (see [`args::torrent_set`]) to the given torrents.
    async fn torrent_set(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
        arguments: Arguments,
    ) -> Result<(), RpcError>;
    /// Reads `fields` (see [`args::torrent_get`]) of the given torrents.
    async fn torrent_get(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
        fields: &[&str],
    ) -> Result<Vec<Arguments>, RpcError>;
    /// Adds a torrent. `arguments` must contain `filename` or `metainfo`.
    ///
    /// Fails with [`RpcError::DuplicateTorrent`] if the torrent is already present.
    async fn torrent_add(
        &self,
        session_id: &str,
        arguments: Arguments,
    ) -> Result<AddedTorrent, RpcError>;
    /// Removes the given torrents, optionally deleting their data.
    async fn torrent_remove(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
        delete_local_data: bool,
    ) -> Result<(), RpcError>;
    /// Points the given torrents at `location`. With `move_data`, data is moved from the previous
    /// location; otherwise `location` is searched for the files.
    async fn torrent_set_location(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
        location: &str,
        move_data: bool,
    ) -> Result<(), RpcError>;
    /// Renames `path` of torrent `id` to `name`.
    async fn torrent_rename_path(
        &self,
        session_id: &str,
        id: u64,
        path: &str,
        name: &str,
    ) -> Result<RenamedPath, RpcError>;
    /// Changes session settings (see [`args::session::SETTINGS`]).
    async fn session_set(&self, session_id: &str, arguments: Arguments) -> Result<(), RpcError>;
    /// Reads all session settings.
    async fn session_get(&self, session_id: &str) -> Result<Arguments, RpcError>;
    /// Reads session statistics (see [`args::session_stats`]).
    async fn session_stats(&self, session_id: &str) -> Result<Arguments, RpcError>;
    /// Downloads the blocklist again and returns its size.
    async fn blocklist_update(&self, session_id: &str) -> Result<u64, RpcError>;
    /// Whether the peer port is reachable from the outside.
    async fn port_test(&self, session_id: &str) -> Result<bool, RpcError>;
    /// Shuts the daemon down.
    async fn session_close(&self, session_id: &str) -> Result<(), RpcError>;
    /// Moves the given torrents to the top of the queue.
    async fn queue_move_top(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError>;
    /// Moves the given torrents one position up the queue.
    async fn queue_move_up(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError>;
    /// Moves the given torrents one position down the queue.
    async fn queue_move_down(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError>;
    /// Moves the given torrents to the bottom of the queue.
    async fn queue_move_bottom(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
    ) -> Result<(), RpcError>;
    /// Free space in `path` on the daemon's host.
    async fn free_space(&self, session_id: &str, path: &str) -> Result<FreeSpace, RpcError>;
}

impl<T: HttpTransport> RpcClient<T> {
    async fn invoke(
        &self,
        session_id: &str,
        method: RpcMethod,
        arguments: &Arguments,
    ) -> Result<Arguments, RpcError> {
        debug!("Calling {method}");
        self.call(session_id, method.as_str(), arguments).await
    }

    async fn invoke_on(
        &self,
        session_id: &str,
        method: RpcMethod,
        ids: &TorrentIdList,
    ) -> Result<(), RpcError> {
        self.invoke(session_id, method, &with_ids(ids)).await?;
        Ok(())
    }
}

impl<T: HttpTransport> TransmissionApi for RpcClient<T> {
    async fn torrent_start(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError> {
        self.invoke_on(session_id, RpcMethod::TorrentStart, ids).await
    }

    async fn torrent_start_now(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
    ) -> Result<(), RpcError> {
        self.invoke_on(session_id, RpcMethod::TorrentStartNow, ids)
            .await
    }

    async fn torrent_stop(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError> {
        self.invoke_on(session_id, RpcMethod::TorrentStop, ids).await
    }

    async fn torrent_verify(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError> {
        self.invoke_on(session_id, RpcMethod::TorrentVerify, ids)
            .await
    }

    async fn torrent_reannounce(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
    ) -> Result<(), RpcError> {
        self.invoke_on(session_id, RpcMethod::TorrentReannounce, ids)
            .await
    }

    async fn torrent_set(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
        arguments: Arguments,
    ) -> Result<(), RpcError> {
        let method = RpcMethod::TorrentSet;
        for (name, value) in &arguments {
            let spec = args::find(torrent_set::ARGUMENTS, name).ok_or_else(|| {
                RpcError::UnknownArgument {
                    method: method.as_str(),
                    argument: name.clone(),
                }
            })?;
            check_type(spec, value)?;
        }

        let mut request = with_ids(ids);
        request.extend(arguments);
        self.invoke(session_id, method, &request).await?;
        Ok(())
    }

    async fn torrent_get(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
        fields: &[&str],
    ) -> Result<Vec<Arguments>, RpcError> {
        let mut request = with_ids(ids);
        request.insert(torrent_get::FIELDS.into(), fields.into());

        let mut response = self
            .invoke(session_id, RpcMethod::TorrentGet, &request)
            .await?;
        take(&mut response, torrent_get::TORRENTS)
    }

    async fn torrent_add(
        &self,
        session_id: &str,
        arguments: Arguments,
    ) -> Result<AddedTorrent, RpcError> {
        let method = RpcMethod::TorrentAdd;
        if !torrent_add::SOURCES
            .iter()
            .any(|source| arguments.contains_key(*source))
        {
            return Err(RpcError::MissingArgument {
                method: method.as_str(),
                expected: torrent_add::SOURCES,
            });
        }
        for (name, value) in &arguments {
            let spec = args::find(torrent_add::ARGUMENTS, name).ok_or_else(|| {
                RpcError::UnknownArgument {
                    method: method.as_str(),
                    argument: name.clone(),
                }
            })?;
            check_type(spec, value)?;
        }

        let mut response = self.invoke(session_id, method, &arguments).await?;
        let added: AddedTorrent = take(&mut response, torrent_add::TORRENT_ADDED)?;
        debug!("Added {added:?}");
        Ok(added)
    }

    async fn torrent_remove(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
        delete_local_data: bool,
    ) -> Result<(), RpcError> {
        let mut request = with_ids(ids);
        if delete_local_data {
            request.insert(torrent_remove::DELETE_LOCAL_DATA.into(), true.into());
        }
        self.invoke(session_id, RpcMethod::TorrentRemove, &request)
            .await?;
        Ok(())
    }

    async fn torrent_set_location(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
        location: &str,
        move_data: bool,
    ) -> Result<(), RpcError> {
        let mut request = with_ids(ids);
        request.insert(torrent_set_location::LOCATION.into(), location.into());
        request.insert(torrent_set_location::MOVE.into(), move_data.into());
        self.invoke(session_id, RpcMethod::TorrentSetLocation, &request)
            .await?;
        Ok(())
    }

    async fn torrent_rename_path(
        &self,
        session_id: &str,
        id: u64,
        path: &str,
        name: &str,
    ) -> Result<RenamedPath, RpcError> {
        let mut request = with_ids(&TorrentIdList::new([id]));
        request.insert(torrent_rename_path::PATH.into(), path.into());
        request.insert(torrent_rename_path::NAME.into(), name.into());

        let response = self
            .invoke(session_id, RpcMethod::TorrentRenamePath, &request)
            .await?;
        from_arguments(response)
    }

    async fn session_set(&self, session_id: &str, arguments: Arguments) -> Result<(), RpcError> {
        let method = RpcMethod::SessionSet;
        for (name, value) in &arguments {
            if args::find(session::READ_ONLY, name).is_some() {
                return Err(RpcError::ReadOnlyArgument {
                    argument: name.clone(),
                });
            }
            let spec =
                args::find(session::SETTINGS, name).ok_or_else(|| RpcError::UnknownArgument {
                    method: method.as_str(),
                    argument: name.clone(),
                })?;
            check_type(spec, value)?;
        }

        self.invoke(session_id, method, &arguments).await?;
        Ok(())
    }

    async fn session_get(&self, session_id: &str) -> Result<Arguments, RpcError> {
        self.invoke(session_id, RpcMethod::SessionGet, &Arguments::new())
            .await
    }

    async fn session_stats(&self, session_id: &str) -> Result<Arguments, RpcError> {
        self.invoke(session_id, RpcMethod::SessionStats, &Arguments::new())
            .await
    }

    async fn blocklist_update(&self, session_id: &str) -> Result<u64, RpcError> {
        let mut response = self
            .invoke(session_id, RpcMethod::BlocklistUpdate, &Arguments::new())
            .await
            .map_err(|err| match err {
                RpcError::Remote { result, .. } if result.starts_with(BLOCKLIST_NOT_FOUND) => {
                    RpcError::BlocklistNotFound { result }
                }
                other => other,
            })?;
        take(&mut response, session::BLOCKLIST_SIZE)
    }

    async fn port_test(&self, session_id: &str) -> Result<bool, RpcError> {
        let mut response = self
            .invoke(session_id, RpcMethod::PortTest, &Arguments::new())
            .await?;
        take(&mut response, session::PORT_IS_OPEN)
    }

    async fn session_close(&self, session_id: &str) -> Result<(), RpcError> {
        self.invoke(session_id, RpcMethod::SessionClose, &Arguments::new())
            .await?;
        Ok(())
    }

    async fn queue_move_top(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError> {
        self.invoke_on(session_id, RpcMethod::QueueMoveTop, ids)
            .await
    }

    async fn queue_move_up(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError> {
        self.invoke_on(session_id, RpcMethod::QueueMoveUp, ids).await
    }

    async fn queue_move_down(&self, session_id: &str, ids: &TorrentIdList) -> Result<(), RpcError> {
        self.invoke_on(session_id, RpcMethod::QueueMoveDown, ids)
            .await
    }

    async fn queue_move_bottom(
        &self,
        session_id: &str,
        ids: &TorrentIdList,
    ) -> Result<(), RpcError> {
        self.invoke_on(session_id, RpcMethod::QueueMoveBottom, ids)
            .await
    }

    async fn free_space(&self, session_id: &str, path: &str) -> Result<FreeSpace, RpcError> {
        let mut request = Arguments::new();
        request.insert(free_space::PATH.into(), path.into());

        let response = self
            .invoke(session_id, RpcMethod::FreeSpace, &request)
            .await?;
        from_arguments(response)
    }
}

/// Starts an argument mapping with `ids`, left out when the list is empty so the daemon targets
/// every torrent.
fn with_ids(ids: &TorrentIdList) -> Arguments {
    let mut arguments = Arguments::new();
    if !ids.is_empty() {
        arguments.insert(IDS.into(), Value::from(ids));
    }
    arguments
}

fn check_type(spec: ArgumentSpec, value: &Value) -> Result<(), RpcError> {
    if spec.accepts(value) {
        return Ok(());
    }
    Err(RpcError::InvalidArgumentType {
        argument: spec.name.to_string(),
        expected: spec.kind,
        actual: ValueKind::of(value),
    })
}

/// Removes `key` from a successful response and deserializes it.
fn take<D: DeserializeOwned>(response: &mut Arguments, key: &str) -> Result<D, RpcError> {
    let value = response
        .remove(key)
        .ok_or_else(|| RpcError::malformed(format!("missing \"{key}\" in response")))?;
    serde_json::from_value(value)
        .map_err(|e| RpcError::malformed(format!("invalid \"{key}\" in response: {e}")))
}

fn from_arguments<D: DeserializeOwned>(response: Arguments) -> Result<D, RpcError> {
    serde_json::from_value(Value::Object(response))
        .map_err(|e| RpcError::malformed(format!("unexpected response: {e}")))
}
