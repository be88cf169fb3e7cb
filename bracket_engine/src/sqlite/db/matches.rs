use log::{debug, trace};
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Match, NewMatch},
    traits::{CompareAndSet, InsertMatchesResult, MatchFilter, MatchPatch, MatchRepositoryError},
};

/// Fetches matches according to the criteria in the `MatchFilter`.
///
/// Resulting matches are ordered by stage, then sequence, then id.
pub async fn find_matches(filter: MatchFilter, conn: &mut SqliteConnection) -> Result<Vec<Match>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM matches WHERE competition_id = ");
    builder.push_bind(filter.competition_id);
    if let Some(stage) = filter.stage {
        builder.push(" AND stage = ");
        builder.push_bind(stage);
    }
    if let Some(prefixes) = filter.stage_prefixes {
        if prefixes.is_empty() {
            builder.push(" AND 0");
        } else {
            builder.push(" AND (");
            let mut prefix_clause = builder.separated(" OR ");
            for prefix in prefixes {
                // LIKE is case-insensitive in SQLite, so compare the raw prefix instead
                prefix_clause.push("substr(stage, 1, length(");
                prefix_clause.push_bind_unseparated(prefix.clone());
                prefix_clause.push_unseparated(")) = ");
                prefix_clause.push_bind_unseparated(prefix);
            }
            builder.push(")");
        }
    }
    if let Some(team) = filter.team {
        builder.push(" AND (home_team = ");
        builder.push_bind(team.clone());
        builder.push(" OR away_team = ");
        builder.push_bind(team);
        builder.push(")");
    }
    builder.push(" ORDER BY stage ASC, sequence ASC, id ASC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let matches = builder.build_query_as::<Match>().fetch_all(conn).await?;
    trace!("🗃️ Result of find_matches: {} matches", matches.len());
    Ok(matches)
}

pub async fn fetch_match(id: i64, conn: &mut SqliteConnection) -> Result<Option<Match>, sqlx::Error> {
    let result = sqlx::query_as("SELECT * FROM matches WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(result)
}

pub(crate) async fn update_match(
    id: i64,
    patch: MatchPatch,
    conn: &mut SqliteConnection,
) -> Result<Option<Match>, MatchRepositoryError> {
    if patch.is_empty() {
        debug!("🗃️ No fields to update for match {id}. Update request skipped.");
        return Err(MatchRepositoryError::MatchModificationNoOp);
    }
    let mut builder = QueryBuilder::new("UPDATE matches SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(score) = patch.home_score {
        set_clause.push("home_score = ");
        set_clause.push_bind_unseparated(score);
    }
    if let Some(score) = patch.away_score {
        set_clause.push("away_score = ");
        set_clause.push_bind_unseparated(score);
    }
    if let Some(sequence) = patch.sequence {
        set_clause.push("sequence = ");
        set_clause.push_bind_unseparated(sequence);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let res = builder.build().fetch_optional(conn).await?.map(|row: SqliteRow| Match::from_row(&row)).transpose()?;
    trace!("🗃️ Result of update_match: {res:?}");
    Ok(res)
}

/// Rewrites a team slot if, and only if, it still holds the expected value. Returns the number of rows changed.
pub(crate) async fn compare_and_set(op: CompareAndSet, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let column = op.slot.team_column();
    let mut builder = QueryBuilder::new(format!("UPDATE matches SET updated_at = CURRENT_TIMESTAMP, {column} = "));
    builder.push_bind(op.value);
    builder.push(" WHERE competition_id = ");
    builder.push_bind(op.competition_id);
    builder.push(format!(" AND {column} = "));
    builder.push_bind(op.expected);
    if let Some(stage) = op.stage {
        builder.push(" AND stage = ");
        builder.push_bind(stage);
    }
    trace!("🗃️ Executing query: {}", builder.sql());
    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}

/// Inserts the match, unless one with the same competition and external id already exists, in which case `None` is
/// returned.
async fn idempotent_insert(m: NewMatch, conn: &mut SqliteConnection) -> Result<Option<Match>, sqlx::Error> {
    let inserted = sqlx::query_as(
        r#"
            INSERT INTO matches (
                competition_id,
                stage,
                home_team,
                away_team,
                home_score,
                away_score,
                sequence,
                external_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (competition_id, external_id) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(m.competition_id)
    .bind(m.stage)
    .bind(m.home_team)
    .bind(m.away_team)
    .bind(m.home_score)
    .bind(m.away_score)
    .bind(m.sequence)
    .bind(m.external_id)
    .fetch_optional(conn)
    .await?;
    Ok(inserted)
}

/// Inserts all the matches using the given connection. This is not atomic. Embed the call in a transaction if you
/// need atomicity, passing `&mut *tx` as the connection argument.
pub(crate) async fn insert_many(
    matches: Vec<NewMatch>,
    conn: &mut SqliteConnection,
) -> Result<InsertMatchesResult, sqlx::Error> {
    let mut result = InsertMatchesResult::default();
    for m in matches {
        let key = m.external_id.clone();
        match idempotent_insert(m, conn).await? {
            Some(inserted) => {
                trace!("🗃️ Match {inserted} inserted");
                result.inserted.push(inserted);
            },
            None => {
                let key = key.unwrap_or_default();
                debug!("🗃️ Match [{key}] already exists. Skipping.");
                result.skipped.push(key);
            },
        }
    }
    Ok(result)
}
