// PostgreSQL data store
//
// Availability is enforced twice: the conditional insert locks the room type
// row before counting overlaps, and the `bookings_no_active_overlap`
// exclusion constraint rejects anything that slips past.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::bookings::{Booking, BookingFilter, BookingStatus, NewBooking, StatusMachine};
use crate::rooms::{DatePriceOverride, NewRoomType, RoomType, RoomTypePatch};
use crate::store::{ConditionalInsert, DataStore, StoreError, StoreResult};

const ROOM_TYPE_COLUMNS: &str =
    "id, name, description, capacity, base_price, weekend_price, created_at, updated_at";

const OVERRIDE_COLUMNS: &str = "id, room_type_id, date, price, created_at, updated_at";

const BOOKING_COLUMNS: &str = "id, room_type_id, check_in, check_out, guest_name, guest_email, \
     guest_phone, adults, children, special_requests, status, total_price, created_at, updated_at";

/// Postgres error codes mapped to `StoreError::Conflict`
const EXCLUSION_VIOLATION: &str = "23P01";
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn map_write_error(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_error) = &error {
        let code = db_error.code();
        match code.as_deref() {
            Some(EXCLUSION_VIOLATION) => {
                return StoreError::Conflict("Stay overlaps an active booking".to_string())
            }
            Some(UNIQUE_VIOLATION) | Some(FOREIGN_KEY_VIOLATION) => {
                return StoreError::Conflict(db_error.message().to_string())
            }
            _ => {}
        }
    }
    StoreError::Database(error)
}

/// Data store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Take a row lock on the room type so concurrent writers for the same
    /// room type queue behind each other. Returns false for an unknown id.
    async fn lock_room_type(tx: &mut Transaction<'_, Postgres>, room_type_id: Uuid) -> StoreResult<bool> {
        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM room_types WHERE id = $1 FOR UPDATE")
            .bind(room_type_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(locked.is_some())
    }

    async fn active_overlaps(
        tx: &mut Transaction<'_, Postgres>,
        room_type_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude: Option<Uuid>,
    ) -> StoreResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM bookings
            WHERE room_type_id = $1
              AND status <> 'cancelled'
              AND check_in < $3
              AND check_out > $2
              AND ($4::uuid IS NULL OR id <> $4)
            ORDER BY check_in
            "#,
        )
        .bind(room_type_id)
        .bind(check_in)
        .bind(check_out)
        .bind(exclude)
        .fetch_all(&mut **tx)
        .await?;
        Ok(ids)
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn find_room_type(&self, id: Uuid) -> StoreResult<Option<RoomType>> {
        let room_type = sqlx::query_as::<_, RoomType>(&format!(
            "SELECT {} FROM room_types WHERE id = $1",
            ROOM_TYPE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room_type)
    }

    async fn list_room_types(&self) -> StoreResult<Vec<RoomType>> {
        let room_types = sqlx::query_as::<_, RoomType>(&format!(
            "SELECT {} FROM room_types ORDER BY name",
            ROOM_TYPE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(room_types)
    }

    async fn insert_room_type(&self, room_type: NewRoomType) -> StoreResult<RoomType> {
        let created = sqlx::query_as::<_, RoomType>(&format!(
            r#"
            INSERT INTO room_types (name, description, capacity, base_price, weekend_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ROOM_TYPE_COLUMNS
        ))
        .bind(&room_type.name)
        .bind(&room_type.description)
        .bind(room_type.capacity)
        .bind(room_type.base_price)
        .bind(room_type.weekend_price)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(created)
    }

    async fn update_room_type(&self, id: Uuid, patch: RoomTypePatch) -> StoreResult<RoomType> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, RoomType>(&format!(
            "SELECT {} FROM room_types WHERE id = $1 FOR UPDATE",
            ROOM_TYPE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::not_found("RoomType", id))?;

        let merged = patch.apply_to(&existing);

        let updated = sqlx::query_as::<_, RoomType>(&format!(
            r#"
            UPDATE room_types
            SET name = $2, description = $3, capacity = $4, base_price = $5,
                weekend_price = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ROOM_TYPE_COLUMNS
        ))
        .bind(id)
        .bind(&merged.name)
        .bind(&merged.description)
        .bind(merged.capacity)
        .bind(merged.base_price)
        .bind(merged.weekend_price)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_room_type(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM room_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_price_overrides(
        &self,
        room_type_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<DatePriceOverride>> {
        let rows = sqlx::query_as::<_, DatePriceOverride>(&format!(
            r#"
            SELECT {} FROM room_date_prices
            WHERE room_type_id = $1 AND date >= $2 AND date < $3
            ORDER BY date
            "#,
            OVERRIDE_COLUMNS
        ))
        .bind(room_type_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upsert_price_override(
        &self,
        room_type_id: Uuid,
        date: NaiveDate,
        price: Decimal,
    ) -> StoreResult<DatePriceOverride> {
        let row = sqlx::query_as::<_, DatePriceOverride>(&format!(
            r#"
            INSERT INTO room_date_prices (room_type_id, date, price)
            VALUES ($1, $2, $3)
            ON CONFLICT (room_type_id, date)
            DO UPDATE SET price = EXCLUDED.price, updated_at = NOW()
            RETURNING {}
            "#,
            OVERRIDE_COLUMNS
        ))
        .bind(room_type_id)
        .bind(date)
        .bind(price)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| match map_write_error(error) {
            // The only foreign key on this table is the room type
            StoreError::Conflict(_) => StoreError::not_found("RoomType", room_type_id),
            other => other,
        })?;

        Ok(row)
    }

    async fn delete_price_override(&self, room_type_id: Uuid, date: NaiveDate) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM room_date_prices WHERE room_type_id = $1 AND date = $2")
            .bind(room_type_id)
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_bookings(&self, filter: BookingFilter) -> StoreResult<Vec<Booking>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM bookings WHERE 1=1",
            BOOKING_COLUMNS
        ));

        if let Some(room_type_id) = filter.room_type_id {
            query.push(" AND room_type_id = ");
            query.push_bind(room_type_id);
        }

        if !filter.statuses.is_empty() {
            let statuses: Vec<String> = filter
                .statuses
                .iter()
                .map(|status| status.as_str().to_string())
                .collect();
            query.push(" AND status = ANY(");
            query.push_bind(statuses);
            query.push(")");
        }

        if let Some(range) = filter.overlapping {
            query.push(" AND check_in < ");
            query.push_bind(range.check_out());
            query.push(" AND check_out > ");
            query.push_bind(range.check_in());
        }

        query.push(" ORDER BY created_at DESC");

        let bookings = query.build_query_as::<Booking>().fetch_all(&self.pool).await?;

        Ok(bookings)
    }

    async fn find_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn insert_booking_if_available(&self, booking: NewBooking) -> StoreResult<ConditionalInsert> {
        let mut tx = self.pool.begin().await?;

        if !Self::lock_room_type(&mut tx, booking.room_type_id).await? {
            return Err(StoreError::not_found("RoomType", booking.room_type_id));
        }

        if booking.status.is_active() {
            let conflicting = Self::active_overlaps(
                &mut tx,
                booking.room_type_id,
                booking.stay.check_in(),
                booking.stay.check_out(),
                None,
            )
            .await?;

            if !conflicting.is_empty() {
                tx.rollback().await?;
                return Ok(ConditionalInsert::Conflict { conflicting });
            }
        }

        let inserted = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (room_type_id, check_in, check_out, guest_name, guest_email,
                                  guest_phone, adults, children, special_requests, status, total_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(booking.room_type_id)
        .bind(booking.stay.check_in())
        .bind(booking.stay.check_out())
        .bind(&booking.guest_name)
        .bind(&booking.guest_email)
        .bind(&booking.guest_phone)
        .bind(booking.adults)
        .bind(booking.children)
        .bind(&booking.special_requests)
        .bind(booking.status)
        .bind(booking.total_price)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(inserted) => {
                tx.commit().await?;
                Ok(ConditionalInsert::Inserted(inserted))
            }
            Err(error) => match map_write_error(error) {
                StoreError::Conflict(_) => {
                    tx.rollback().await?;
                    Ok(ConditionalInsert::Conflict { conflicting: Vec::new() })
                }
                other => Err(other),
            },
        }
    }

    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = $1 FOR UPDATE",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::not_found("Booking", id))?;

        if StatusMachine::reclaims_inventory(existing.status, status) {
            Self::lock_room_type(&mut tx, existing.room_type_id).await?;
            let conflicting = Self::active_overlaps(
                &mut tx,
                existing.room_type_id,
                existing.check_in,
                existing.check_out,
                Some(id),
            )
            .await?;

            if !conflicting.is_empty() {
                tx.rollback().await?;
                return Err(StoreError::Conflict(format!(
                    "Booking {} overlaps active booking(s) {:?}",
                    id, conflicting
                )));
            }
        }

        let updated = sqlx::query_as::<_, Booking>(&format!(
            "UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

        Ok(updated)
    }
}
