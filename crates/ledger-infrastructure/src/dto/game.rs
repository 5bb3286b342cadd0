//! Game document DTOs (anti-corruption layer between TOML and the domain).

use super::{check_schema_version, invalid_document};
use chrono::{DateTime, Utc};
use ledger_core::error::{LedgerError, Result};
use ledger_core::game::{GameData, Player, PlayerIdentity, PlayerRef, Transaction, TransactionReason};
use ledger_core::ids::{GameId, OrgId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const GAME_SCHEMA_VERSION: &str = "1.0.0";

/// Reason strings accepted when reading. The first one is written.
const PEER_RE_BUY_REASONS: [&str; 2] = ["peer re-buy", "re-buy-in from another player"];

/// V1.0.0: one stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameV1_0_0 {
    pub schema_version: String,
    pub id: String,
    pub organizer: String,
    pub organization: String,
    /// RFC 3339 timestamp
    pub start: String,
    #[serde(default)]
    pub players: Vec<PlayerV1_0_0>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerV1_0_0 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub user_name: String,
    pub start_stack: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_stack: Option<i64>,
    #[serde(default)]
    pub additional_incomes: Vec<TransactionV1_0_0>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionV1_0_0 {
    pub amount: i64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<String>,
    pub from_name: String,
}

fn parse_id<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| invalid_document(format!("{} is not a valid id: '{}'", field, value)))
}

fn parse_optional_id(field: &str, value: Option<&str>) -> Result<Option<UserId>> {
    value.map(|v| parse_id(field, v)).transpose()
}

fn first_duplicate_name(players: &[PlayerV1_0_0]) -> Option<String> {
    let mut names = HashSet::new();
    players
        .iter()
        .find(|player| !names.insert(player.user_name.as_str()))
        .map(|player| player.user_name.clone())
}

impl From<&Transaction> for TransactionV1_0_0 {
    fn from(tx: &Transaction) -> Self {
        Self {
            amount: tx.amount,
            reason: tx.reason.to_string(),
            from_id: tx.from.user_id.map(|id| id.to_string()),
            from_name: tx.from.name.clone(),
        }
    }
}

impl TryFrom<TransactionV1_0_0> for Transaction {
    type Error = LedgerError;

    fn try_from(dto: TransactionV1_0_0) -> Result<Self> {
        if !PEER_RE_BUY_REASONS.contains(&dto.reason.as_str()) {
            return Err(invalid_document(format!(
                "unknown transaction reason '{}'",
                dto.reason
            )));
        }
        if dto.amount <= 0 {
            return Err(invalid_document(format!(
                "transaction from '{}' has non-positive amount {}",
                dto.from_name, dto.amount
            )));
        }
        Ok(Self {
            amount: dto.amount,
            reason: TransactionReason::PeerReBuy,
            from: PlayerRef {
                user_id: parse_optional_id("from_id", dto.from_id.as_deref())?,
                name: dto.from_name,
            },
        })
    }
}

impl From<&Player> for PlayerV1_0_0 {
    fn from(player: &Player) -> Self {
        Self {
            user_id: player.user_id().map(|id| id.to_string()),
            user_name: player.name().to_string(),
            start_stack: player.buy_in,
            finish_stack: player.finish_stack,
            additional_incomes: player.additional_incomes.iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<PlayerV1_0_0> for Player {
    type Error = LedgerError;

    fn try_from(dto: PlayerV1_0_0) -> Result<Self> {
        if dto.start_stack < 0 || dto.finish_stack.is_some_and(|stack| stack < 0) {
            return Err(invalid_document(format!(
                "player '{}' has a negative stack",
                dto.user_name
            )));
        }
        let identity = match parse_optional_id("user_id", dto.user_id.as_deref())? {
            Some(user_id) => PlayerIdentity::Registered {
                user_id,
                name: dto.user_name,
            },
            None => PlayerIdentity::Anonymous {
                name: dto.user_name,
            },
        };
        Ok(Self {
            identity,
            buy_in: dto.start_stack,
            finish_stack: dto.finish_stack,
            additional_incomes: dto
                .additional_incomes
                .into_iter()
                .map(Transaction::try_from)
                .collect::<Result<_>>()?,
        })
    }
}

impl From<&GameData> for GameV1_0_0 {
    fn from(data: &GameData) -> Self {
        Self {
            schema_version: GAME_SCHEMA_VERSION.to_string(),
            id: data.id.to_string(),
            organizer: data.organizer.to_string(),
            organization: data.organization.to_string(),
            start: data.started_at.to_rfc3339(),
            players: data.players.iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<GameV1_0_0> for GameData {
    type Error = LedgerError;

    fn try_from(dto: GameV1_0_0) -> Result<Self> {
        check_schema_version("game", &dto.schema_version, GAME_SCHEMA_VERSION)?;

        let started_at = DateTime::parse_from_rfc3339(&dto.start)
            .map_err(|e| invalid_document(format!("bad start time '{}': {}", dto.start, e)))?
            .with_timezone(&Utc);

        if let Some(duplicate) = first_duplicate_name(&dto.players) {
            return Err(invalid_document(format!(
                "player name '{}' appears more than once",
                duplicate
            )));
        }

        Ok(Self {
            id: parse_id::<GameId>("id", &dto.id)?,
            organizer: parse_id::<UserId>("organizer", &dto.organizer)?,
            organization: parse_id::<OrgId>("organization", &dto.organization)?,
            started_at,
            players: dto
                .players
                .into_iter()
                .map(Player::try_from)
                .collect::<Result<_>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> GameData {
        let alice = UserId::new();
        let mut data = GameData::new(
            UserId::new(),
            OrgId::new(),
            Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap(),
        );
        let mut bob = Player::new(
            PlayerIdentity::Anonymous {
                name: "bob".to_string(),
            },
            100,
        );
        bob.finish_stack = Some(180);
        bob.additional_incomes.push(Transaction {
            amount: 50,
            reason: TransactionReason::PeerReBuy,
            from: PlayerRef {
                user_id: Some(alice),
                name: "alice".to_string(),
            },
        });
        data.players.push(Player::new(
            PlayerIdentity::Registered {
                user_id: alice,
                name: "alice".to_string(),
            },
            150,
        ));
        data.players.push(bob);
        data
    }

    #[test]
    fn test_document_preserves_identity_and_incomes() {
        let data = sample();

        let text = toml::to_string_pretty(&GameV1_0_0::from(&data)).unwrap();
        let dto: GameV1_0_0 = toml::from_str(&text).unwrap();
        let restored = GameData::try_from(dto).unwrap();

        assert_eq!(restored, data);
        assert!(text.contains("schema_version = \"1.0.0\""));
        assert!(text.contains("start_stack = 150"));
        assert!(text.contains("reason = \"peer re-buy\""));
    }

    #[test]
    fn test_legacy_reason_is_accepted() {
        let mut dto = GameV1_0_0::from(&sample());
        dto.players[1].additional_incomes[0].reason = "re-buy-in from another player".to_string();

        let restored = GameData::try_from(dto).unwrap();

        assert_eq!(
            restored.players[1].additional_incomes[0].reason,
            TransactionReason::PeerReBuy
        );
    }

    #[test]
    fn test_unknown_reason_is_rejected() {
        let mut dto = GameV1_0_0::from(&sample());
        dto.players[1].additional_incomes[0].reason = "gift".to_string();

        let err = GameData::try_from(dto).unwrap_err();

        assert!(matches!(err, LedgerError::Serialization { .. }));
    }

    #[test]
    fn test_newer_major_version_is_rejected() {
        let mut dto = GameV1_0_0::from(&sample());
        dto.schema_version = "2.0.0".to_string();
        assert!(GameData::try_from(dto).is_err());

        let mut dto = GameV1_0_0::from(&sample());
        dto.schema_version = "1.3.0".to_string();
        assert!(GameData::try_from(dto).is_ok());
    }

    #[test]
    fn test_duplicate_player_names_are_rejected() {
        let mut dto = GameV1_0_0::from(&sample());
        dto.players[1].user_name = "alice".to_string();

        let err = GameData::try_from(dto).unwrap_err();

        assert!(matches!(err, LedgerError::Serialization { .. }));
        assert!(err.to_string().contains("'alice' appears more than once"));
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let mut dto = GameV1_0_0::from(&sample());
        dto.players[0].start_stack = -1;
        assert!(GameData::try_from(dto).is_err());

        let mut dto = GameV1_0_0::from(&sample());
        dto.players[1].finish_stack = Some(-5);
        let err = GameData::try_from(dto).unwrap_err();
        assert!(err.to_string().contains("player 'bob' has a negative stack"));

        let mut dto = GameV1_0_0::from(&sample());
        dto.players[1].additional_incomes[0].amount = 0;
        assert!(GameData::try_from(dto).is_err());
    }

    #[test]
    fn test_bad_id_is_rejected() {
        let mut dto = GameV1_0_0::from(&sample());
        dto.organizer = "not-a-uuid".to_string();

        let err = GameData::try_from(dto).unwrap_err();

        assert!(err.to_string().contains("organizer"));
    }
}
