use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Appointment, EffectiveService, Master, NewAppointment};
use crate::db::DatabaseError;

/// SQLSTATE for an exclusion-constraint violation. The appointments
/// table carries an exclusion constraint on (master_id, time range)
/// for active statuses, so a concurrent writer that slips past the
/// in-transaction check still surfaces as a conflict, not a 500.
const EXCLUSION_VIOLATION: &str = "23P01";

fn map_booking_error(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) {
            return DatabaseError::SlotConflict;
        }
    }
    DatabaseError::from(err)
}

pub struct BookingRepository;

impl BookingRepository {
    pub async fn get_master(pool: &PgPool, master_id: Uuid) -> Result<Master, DatabaseError> {
        sqlx::query_as::<_, Master>(
            "SELECT id, display_name, phone, created_at FROM masters WHERE id = $1",
        )
        .bind(master_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DatabaseError::NotFound)
    }

    pub async fn get_appointment(
        pool: &PgPool,
        appointment_id: Uuid,
    ) -> Result<Appointment, DatabaseError> {
        sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, master_id, service_id, client_id, status, start_at, end_at,
                   created_at, updated_at
            FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(appointment_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DatabaseError::NotFound)
    }

    /// Effective duration and price for a service as offered by a
    /// specific master: the per-master customization wins, the
    /// service's base values are the fallback.
    pub async fn resolve_service(
        pool: &PgPool,
        master_id: Uuid,
        service_id: Uuid,
    ) -> Result<EffectiveService, DatabaseError> {
        sqlx::query_as::<_, EffectiveService>(
            r#"
            SELECT COALESCE(ms.duration_minutes, s.duration_minutes) AS duration_minutes,
                   COALESCE(ms.price_minor, s.price_minor) AS price_minor
            FROM services s
            LEFT JOIN master_services ms
              ON ms.service_id = s.id AND ms.master_id = $1
            WHERE s.id = $2
            "#,
        )
        .bind(master_id)
        .bind(service_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DatabaseError::NotFound)
    }

    /// Atomically re-check for an overlapping active appointment and
    /// insert. The availability the client saw may be stale by the
    /// time booking is submitted, so this check is authoritative: the
    /// overlap probe locks matching rows for the duration of the
    /// transaction, and the table's exclusion constraint backstops the
    /// race against concurrent inserts.
    pub async fn try_book(pool: &PgPool, new: &NewAppointment) -> Result<Uuid, DatabaseError> {
        let mut tx = pool.begin().await?;

        let clash: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM appointments
            WHERE master_id = $1
              AND status IN ('pending', 'confirmed')
              AND start_at < $3 AND $2 < end_at
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(new.master_id)
        .bind(new.start_at)
        .bind(new.end_at)
        .fetch_optional(&mut *tx)
        .await?;

        if clash.is_some() {
            return Err(DatabaseError::SlotConflict);
        }

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO appointments (master_id, service_id, client_id, start_at, end_at, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING id
            "#,
        )
        .bind(new.master_id)
        .bind(new.service_id)
        .bind(new.client_id)
        .bind(new.start_at)
        .bind(new.end_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_booking_error)?;

        tx.commit().await?;
        Ok(id)
    }
}
