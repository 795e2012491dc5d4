use anyhow::Context;
use chrono::{DateTime, Utc};
use plume::{
    AnyId, GeneratorConfig, KindTag, MemoryTokenStore, PLUME_EPOCH, RawSnowflake,
    SnowflakeGenerator, SystemClock, TokenIssuer, TokenStatus, UserId, UserMarker,
};
use serde::Serialize;
use std::io::Write;

use crate::config::{Command, TokenCommand};

/// Fields of a decoded identifier.
#[derive(Debug, Serialize)]
struct Decoded {
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<KindTag>,
    id: RawSnowflake,
    timestamp: u64,
    worker_id: u8,
    process_id: u8,
    sequence: u16,
    created_at: Option<DateTime<Utc>>,
}

pub fn execute(
    command: Command,
    config: &GeneratorConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Mint { kind, count } => mint(kind, count, config, out),
        Command::Decode { id } => decode(&id, out),
        Command::Token(TokenCommand::Issue { user, ttl_seconds }) => {
            issue_token(&user, ttl_seconds, out)
        }
        Command::Token(TokenCommand::Check {
            created_at,
            ttl_seconds,
            now,
        }) => {
            let status =
                TokenStatus::of_window(created_at, ttl_seconds, now.unwrap_or_else(Utc::now));
            writeln!(out, "{status}")?;
            Ok(())
        }
    }
}

fn mint(
    kind: KindTag,
    count: usize,
    config: &GeneratorConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let generator = SnowflakeGenerator::new(config, SystemClock::default());
    tracing::debug!(?generator, %kind, count, "minting");

    for _ in 0..count {
        let raw = generator.generate().context("failed to mint an id")?;
        writeln!(out, "{}", AnyId::new(kind, raw))?;
    }
    Ok(())
}

/// Accepts `<kind>:<decimal>` or a bare decimal.
fn parse_any(input: &str) -> anyhow::Result<(Option<KindTag>, RawSnowflake)> {
    if input.contains(':') {
        let any: AnyId = input.parse()?;
        Ok((Some(any.kind()), any.raw()))
    } else {
        Ok((None, input.parse()?))
    }
}

fn parse_user(input: &str) -> anyhow::Result<UserId> {
    match parse_any(input)? {
        (Some(kind), raw) => Ok(AnyId::new(kind, raw).downcast::<UserMarker>()?),
        (None, raw) => Ok(UserId::from_raw(raw)),
    }
}

fn decode(input: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let (kind, id) = parse_any(input)?;
    let parts = id.into_parts();
    let decoded = Decoded {
        kind,
        id,
        timestamp: parts.timestamp,
        worker_id: parts.worker_id.get(),
        process_id: parts.process_id.get(),
        sequence: parts.sequence,
        created_at: id.created_at(PLUME_EPOCH),
    };
    serde_json::to_writer_pretty(&mut *out, &decoded)?;
    writeln!(out)?;
    Ok(())
}

/// The CLI has no persistent store, so uniqueness is only checked within
/// this invocation. The record is printed for the caller to persist.
fn issue_token(user: &str, ttl_seconds: Option<u64>, out: &mut impl Write) -> anyhow::Result<()> {
    let user = parse_user(user).with_context(|| format!("invalid --user {user:?}"))?;
    let store = MemoryTokenStore::new();
    let token = TokenIssuer::new().issue(&store, user, ttl_seconds)?;
    tracing::info!(%user, expires_at = ?token.expires_at(), "issued token");

    serde_json::to_writer_pretty(&mut *out, &token)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn run(command: Command) -> String {
        let mut out = Vec::new();
        execute(command, &GeneratorConfig::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn mint_prints_tagged_ids_in_order() {
        let out = run(Command::Mint {
            kind: KindTag::Post,
            count: 3,
        });
        let ids: Vec<AnyId> = out.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.kind() == KindTag::Post));
        assert!(ids.windows(2).all(|w| w[0].raw() < w[1].raw()));
    }

    #[test]
    fn decode_reports_fields() {
        let id = RawSnowflake::from_parts(
            1000,
            plume::WorkerId::new(3).unwrap(),
            plume::ProcessId::new(4).unwrap(),
            5,
        );
        let out = run(Command::Decode {
            id: format!("user:{id}"),
        });
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["kind"], "user");
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["timestamp"], 1000);
        assert_eq!(json["worker_id"], 3);
        assert_eq!(json["process_id"], 4);
        assert_eq!(json["sequence"], 5);
        assert_eq!(json["created_at"], "2025-01-01T00:00:01Z");

        let bare: Value =
            serde_json::from_str(&run(Command::Decode { id: id.to_string() })).unwrap();
        assert!(bare.get("kind").is_none());
        assert_eq!(bare["timestamp"], 1000);
    }

    #[test]
    fn decode_rejects_garbage() {
        let mut out = Vec::new();
        let config = GeneratorConfig::default();
        for input in ["", "abc", "comment:1", "user:-1"] {
            let command = Command::Decode {
                id: input.to_owned(),
            };
            assert!(execute(command, &config, &mut out).is_err(), "{input:?}");
        }
    }

    #[test]
    fn issue_prints_record_for_user() {
        let out = run(Command::Token(TokenCommand::Issue {
            user: "user:42".to_owned(),
            ttl_seconds: Some(60),
        }));
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["user"], "42");
        assert_eq!(json["expires_after_seconds"], 60);
        assert_eq!(json["token"].as_str().unwrap().len(), 30);
    }

    #[test]
    fn issue_rejects_non_user_ids() {
        assert!(parse_user("post:42").is_err());
        assert_eq!(parse_user("42").unwrap(), UserId::from_raw(42u64));
    }

    #[test]
    fn check_prints_status() {
        let created_at: DateTime<Utc> = "2025-01-01T00:00:00Z".parse().unwrap();
        let check = |now: &str| {
            run(Command::Token(TokenCommand::Check {
                created_at,
                ttl_seconds: Some(3600),
                now: Some(now.parse().unwrap()),
            }))
        };
        assert_eq!(check("2025-01-01T01:00:00Z"), "valid\n");
        assert_eq!(check("2025-01-01T01:00:01Z"), "expired\n");
    }
}
