//! `PostgreSQL` repository implementation for moderation rules.

use super::{
    models::{ModerationRuleRow, NewModerationRuleRow},
    schema::moderation_rules,
};
use crate::moderation::{
    domain::{ChannelId, EmailAddress, ModerationRule, PersistedRuleData, RuleId, RuleStatus},
    ports::{ModerationRepositoryError, ModerationRepositoryResult, ModerationRuleRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::upsert::excluded;

/// `PostgreSQL` connection pool type used by moderation adapters.
pub type ModerationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed moderation rule repository.
#[derive(Debug, Clone)]
pub struct PostgresModerationRuleRepository {
    pool: ModerationPgPool,
}

impl PostgresModerationRuleRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ModerationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ModerationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ModerationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(ModerationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ModerationRepositoryError::persistence)?
    }
}

#[async_trait]
impl ModerationRuleRepository for PostgresModerationRuleRepository {
    async fn upsert(
        &self,
        channel_id: ChannelId,
        emails: &[EmailAddress],
        status: RuleStatus,
        timestamp: DateTime<Utc>,
    ) -> ModerationRepositoryResult<Vec<ModerationRule>> {
        let channel_uuid = channel_id.into_inner();
        let mut addresses: Vec<String> = Vec::with_capacity(emails.len());
        for email in emails {
            if !addresses.iter().any(|known| known == email.as_str()) {
                addresses.push(email.as_str().to_owned());
            }
        }
        let status_val = status.as_str().to_owned();

        self.run_blocking(move |connection| {
            let rows = connection
                .transaction::<_, DieselError, _>(|tx| {
                    upsert_batch(tx, channel_uuid, &addresses, &status_val, timestamp)?;
                    moderation_rules::table
                        .filter(moderation_rules::channel_id.eq(channel_uuid))
                        .filter(moderation_rules::email.eq_any(&addresses))
                        .select(ModerationRuleRow::as_select())
                        .load::<ModerationRuleRow>(tx)
                })
                .map_err(ModerationRepositoryError::persistence)?;

            let mut rules = rows
                .into_iter()
                .map(row_to_rule)
                .collect::<ModerationRepositoryResult<Vec<_>>>()?;
            rules.sort_by_key(|rule| {
                addresses
                    .iter()
                    .position(|address| address == rule.email().as_str())
            });
            Ok(rules)
        })
        .await
    }

    async fn list_for_channel(
        &self,
        channel_id: ChannelId,
    ) -> ModerationRepositoryResult<Vec<ModerationRule>> {
        self.run_blocking(move |connection| {
            let rows = moderation_rules::table
                .filter(moderation_rules::channel_id.eq(channel_id.into_inner()))
                .order(moderation_rules::email.asc())
                .select(ModerationRuleRow::as_select())
                .load::<ModerationRuleRow>(connection)
                .map_err(ModerationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_rule).collect()
        })
        .await
    }

    async fn count_for_channel(&self, channel_id: ChannelId) -> ModerationRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            let count: i64 = moderation_rules::table
                .filter(moderation_rules::channel_id.eq(channel_id.into_inner()))
                .count()
                .get_result(connection)
                .map_err(ModerationRepositoryError::persistence)?;
            usize::try_from(count).map_err(ModerationRepositoryError::invalid_persisted_data)
        })
        .await
    }
}

/// Inserts every address in one statement; conflicting rows take the new
/// status unless they already hold it, so their `updated_at` stays put.
fn upsert_batch(
    connection: &mut PgConnection,
    channel_uuid: uuid::Uuid,
    addresses: &[String],
    status: &str,
    timestamp: DateTime<Utc>,
) -> Result<usize, DieselError> {
    use diesel::query_dsl::methods::FilterDsl;
    if addresses.is_empty() {
        return Ok(0);
    }
    let mut new_rows: Vec<NewModerationRuleRow> = addresses
        .iter()
        .map(|address| NewModerationRuleRow {
            id: RuleId::new().into_inner(),
            channel_id: channel_uuid,
            email: address.clone(),
            status: status.to_owned(),
            created_at: timestamp,
            updated_at: timestamp,
        })
        .collect();
    // Stable lock order across concurrent batches.
    new_rows.sort_by(|left, right| left.email.cmp(&right.email));

    diesel::insert_into(moderation_rules::table)
        .values(&new_rows)
        .on_conflict((moderation_rules::channel_id, moderation_rules::email))
        .do_update()
        .set((
            moderation_rules::status.eq(excluded(moderation_rules::status)),
            moderation_rules::updated_at.eq(excluded(moderation_rules::updated_at)),
        ))
        .filter(moderation_rules::status.ne(excluded(moderation_rules::status)))
        .execute(connection)
}

fn row_to_rule(row: ModerationRuleRow) -> ModerationRepositoryResult<ModerationRule> {
    let ModerationRuleRow {
        id,
        channel_id,
        email,
        status,
        created_at,
        updated_at,
    } = row;

    let parsed_email =
        EmailAddress::parse(&email).map_err(ModerationRepositoryError::invalid_persisted_data)?;
    let parsed_status = RuleStatus::try_from(status.as_str())
        .map_err(ModerationRepositoryError::invalid_persisted_data)?;

    Ok(ModerationRule::from_persisted(PersistedRuleData {
        id: RuleId::from_uuid(id),
        channel_id: ChannelId::from_uuid(channel_id),
        email: parsed_email,
        status: parsed_status,
        created_at,
        updated_at,
    }))
}
