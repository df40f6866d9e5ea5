//! Remote board store speaking the JSON REST contract:
//!
//! | Route | Body |
//! |---|---|
//! | `GET /api/players` | none, returns `{G, F, C}` |
//! | `POST /api/players/{id}/draft` | `{drafted}` |
//! | `POST /api/players/{id}/separator` | `{hasSeparator, label}` |
//! | `POST /api/players/reorder` | `{column, playerIds}` |

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{BackingStore, StoreError};
use crate::model::{Board, Column, PlayerId};

#[derive(Debug, Serialize)]
struct DraftRequest {
    drafted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeparatorRequest<'a> {
    has_separator: bool,
    label: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderRequest<'a> {
    column: Column,
    player_ids: &'a [PlayerId],
}

#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default = "default_success")]
    success: bool,
}

const fn default_success() -> bool {
    true
}

/// Board store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStore {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpStore {
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent("draftboard")
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), StoreError> {
        let url = self.url(path);
        let response = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|err| http_error(&url, &err))?;

        let ack: Ack = response
            .into_json()
            .map_err(|err| StoreError::Decode(format!("ack from {url}: {err}")))?;
        if ack.success {
            Ok(())
        } else {
            Err(StoreError::Http {
                url,
                message: "store answered success=false".to_string(),
            })
        }
    }
}

fn http_error(url: &str, err: &ureq::Error) -> StoreError {
    let message = match err {
        ureq::Error::Status(code, _) => format!("status {code}"),
        ureq::Error::Transport(transport) => transport.to_string(),
    };
    StoreError::Http {
        url: url.to_string(),
        message,
    }
}

impl BackingStore for HttpStore {
    fn fetch_board(&mut self) -> Result<Board, StoreError> {
        let url = self.url("/api/players");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|err| http_error(&url, &err))?;
        let mut board = response
            .into_json::<Board>()
            .map_err(|err| StoreError::Decode(format!("board from {url}: {err}")))?;
        // The server reports a zero total when either input is unknown.
        for player in board.players_mut() {
            player.stats.normalize();
        }
        Ok(board)
    }

    fn set_drafted(&mut self, id: PlayerId, drafted: bool) -> Result<(), StoreError> {
        self.post(&format!("/api/players/{id}/draft"), &DraftRequest { drafted })
    }

    fn set_separator(
        &mut self,
        id: PlayerId,
        has_separator: bool,
        label: &str,
    ) -> Result<(), StoreError> {
        self.post(
            &format!("/api/players/{id}/separator"),
            &SeparatorRequest {
                has_separator,
                label,
            },
        )
    }

    fn reorder_column(&mut self, column: Column, ids: &[PlayerId]) -> Result<(), StoreError> {
        self.post(
            "/api/players/reorder",
            &ReorderRequest {
                column,
                player_ids: ids,
            },
        )
    }

    fn assign_column(&mut self, _id: PlayerId, _column: Column) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("column reassignment"))
    }
}
