// src/db/leads.rs
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Lead, LeadStatus, NewLead};
use crate::errors::ServerError;

const LEAD_COLUMNS: &str = "id, name, phone, email, address, city, status, source, notes, \
                            lat, lng, created_at, updated_at";

/// Same text shape SQLite's `datetime('now')` produces, so legacy rows sort with ours.
pub fn db_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn lead_from_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get("id")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
        address: row.get("address")?,
        city: row.get("city")?,
        status: row.get("status")?,
        source: row.get("source")?,
        notes: row.get("notes")?,
        lat: row.get("lat")?,
        lng: row.get("lng")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Newest first. `search` is a substring over name/phone/address/city.
pub fn list_leads(
    conn: &Connection,
    search: Option<&str>,
    status: Option<LeadStatus>,
) -> Result<Vec<Lead>, ServerError> {
    let mut sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE 1=1");
    let mut args: Vec<String> = Vec::new();

    if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
        sql.push_str(" AND (name LIKE ?1 OR phone LIKE ?1 OR address LIKE ?1 OR city LIKE ?1)");
        args.push(format!("%{term}%"));
    }
    if let Some(status) = status {
        sql.push_str(&format!(" AND status = ?{}", args.len() + 1));
        args.push(status.as_str().to_string());
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), lead_from_row)?;

    let mut leads = Vec::new();
    for lead in rows {
        leads.push(lead?);
    }
    Ok(leads)
}

pub fn get_lead(conn: &Connection, id: i64) -> Result<Option<Lead>, ServerError> {
    conn.query_row(
        &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
        params![id],
        lead_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select lead failed: {e}")))
}

/// Inserts a new row and returns its id. Status defaults to New.
pub fn insert_lead(
    conn: &Connection,
    lead: &NewLead,
    coords: Option<(f64, f64)>,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    let ts = db_timestamp(now);
    conn.execute(
        r#"
        INSERT INTO leads (
            name, phone, email, address, city, status, source, notes,
            lat, lng, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            lead.name.trim(),
            &lead.phone,
            &lead.email,
            &lead.address,
            &lead.city,
            lead.status.unwrap_or_default(),
            &lead.source,
            &lead.notes,
            coords.map(|c| c.0),
            coords.map(|c| c.1),
            &ts,
            &ts,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert lead failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

/// Writes every mutable column of `lead` back to its row.
pub fn update_lead(conn: &Connection, lead: &Lead) -> Result<(), ServerError> {
    let changed = conn
        .execute(
            r#"
            UPDATE leads SET
                name = ?1, phone = ?2, email = ?3, address = ?4, city = ?5,
                status = ?6, source = ?7, notes = ?8, lat = ?9, lng = ?10,
                updated_at = ?11
            WHERE id = ?12
            "#,
            params![
                lead.name.trim(),
                &lead.phone,
                &lead.email,
                &lead.address,
                &lead.city,
                lead.status,
                &lead.source,
                &lead.notes,
                lead.lat,
                lead.lng,
                db_timestamp(lead.updated_at),
                lead.id,
            ],
        )
        .map_err(|e| ServerError::DbError(format!("update lead failed: {e}")))?;

    if changed == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Only touches lat/lng; used by the batch geocoder.
pub fn set_coordinates(
    conn: &Connection,
    id: i64,
    coords: Option<(f64, f64)>,
) -> Result<(), ServerError> {
    conn.execute(
        "UPDATE leads SET lat = ?1, lng = ?2 WHERE id = ?3",
        params![coords.map(|c| c.0), coords.map(|c| c.1), id],
    )
    .map_err(|e| ServerError::DbError(format!("set coordinates failed: {e}")))?;
    Ok(())
}

/// Returns true when a row was removed.
pub fn delete_lead(conn: &Connection, id: i64) -> Result<bool, ServerError> {
    let removed = conn
        .execute("DELETE FROM leads WHERE id = ?1", params![id])
        .map_err(|e| ServerError::DbError(format!("delete lead failed: {e}")))?;
    Ok(removed > 0)
}

/// Leads with something to geocode but no coordinates yet, oldest first.
pub fn leads_missing_coordinates(conn: &Connection) -> Result<Vec<Lead>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads \
         WHERE (address IS NOT NULL OR city IS NOT NULL) AND lat IS NULL \
         ORDER BY id"
    ))?;
    let rows = stmt.query_map([], lead_from_row)?;

    let mut leads = Vec::new();
    for lead in rows {
        leads.push(lead?);
    }
    Ok(leads)
}

/// Bulk insert in one transaction. Either every row lands or none do.
pub fn seed_leads(
    conn: &mut Connection,
    leads: &[NewLead],
    now: NaiveDateTime,
) -> Result<usize, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    for lead in leads {
        lead.validate()?;
        insert_lead(&tx, lead, lead.explicit_coordinates(), now)?;
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
    Ok(leads.len())
}

pub fn count_leads(conn: &Connection) -> Result<i64, ServerError> {
    conn.query_row("SELECT COUNT(*) FROM leads", [], |r| r.get(0))
        .map_err(|e| ServerError::DbError(format!("count leads failed: {e}")))
}

/// Lead count per pipeline stage, in `LeadStatus::ALL` order. Empty stages read 0.
pub fn count_by_status(conn: &Connection) -> Result<Vec<(LeadStatus, i64)>, ServerError> {
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM leads GROUP BY status")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;

    let mut counts: Vec<(LeadStatus, i64)> = LeadStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for row in rows {
        let (raw, n) = row?;
        match counts.iter_mut().find(|(s, _)| s.as_str() == raw) {
            Some(slot) => slot.1 = n,
            None => tracing::warn!("{n} leads with unknown status {raw:?}"),
        }
    }
    Ok(counts)
}
