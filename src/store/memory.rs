// In-memory data store
//
// Backs the service when no DATABASE_URL is configured and drives the test
// suites. A single write lock serialises the availability check and the
// insert, giving the same guarantee as the Postgres transaction.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::bookings::{
    AvailabilityChecker, Booking, BookingFilter, BookingStatus, NewBooking, StatusMachine,
};
use crate::rooms::{DatePriceOverride, NewRoomType, RoomType, RoomTypePatch};
use crate::store::{ConditionalInsert, DataStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    room_types: HashMap<Uuid, RoomType>,
    /// Keyed by `(room_type_id, date)` so an override per pair is unique
    price_overrides: BTreeMap<(Uuid, NaiveDate), DatePriceOverride>,
    bookings: HashMap<Uuid, Booking>,
}

impl Tables {
    fn active_conflicts(&self, room_type_id: Uuid, booking: &Booking) -> Vec<Uuid> {
        let Some(stay) = booking.stay() else {
            return Vec::new();
        };
        let others: Vec<Booking> = self
            .bookings
            .values()
            .filter(|other| other.id != booking.id)
            .cloned()
            .collect();
        AvailabilityChecker::conflicting_bookings(room_type_id, &stay, &others)
            .map(|other| other.id)
            .collect()
    }
}

/// Data store holding every table in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn find_room_type(&self, id: Uuid) -> StoreResult<Option<RoomType>> {
        Ok(self.tables.read().await.room_types.get(&id).cloned())
    }

    async fn list_room_types(&self) -> StoreResult<Vec<RoomType>> {
        let tables = self.tables.read().await;
        let mut room_types: Vec<RoomType> = tables.room_types.values().cloned().collect();
        room_types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(room_types)
    }

    async fn insert_room_type(&self, room_type: NewRoomType) -> StoreResult<RoomType> {
        let now = Utc::now();
        let stored = RoomType {
            id: Uuid::new_v4(),
            name: room_type.name,
            description: room_type.description,
            capacity: room_type.capacity,
            base_price: room_type.base_price,
            weekend_price: room_type.weekend_price,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .room_types
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_room_type(&self, id: Uuid, patch: RoomTypePatch) -> StoreResult<RoomType> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .room_types
            .get(&id)
            .ok_or_else(|| StoreError::not_found("RoomType", id))?;
        let mut updated = patch.apply_to(existing);
        updated.updated_at = Utc::now();
        tables.room_types.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_room_type(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.bookings.values().any(|booking| booking.room_type_id == id) {
            return Err(StoreError::Conflict(format!(
                "Room type {} is referenced by existing bookings",
                id
            )));
        }
        let removed = tables.room_types.remove(&id).is_some();
        if removed {
            tables.price_overrides.retain(|(room_type_id, _), _| *room_type_id != id);
        }
        Ok(removed)
    }

    async fn list_price_overrides(
        &self,
        room_type_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<DatePriceOverride>> {
        if to <= from {
            return Ok(Vec::new());
        }
        let tables = self.tables.read().await;
        Ok(tables
            .price_overrides
            .range((room_type_id, from)..(room_type_id, to))
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn upsert_price_override(
        &self,
        room_type_id: Uuid,
        date: NaiveDate,
        price: Decimal,
    ) -> StoreResult<DatePriceOverride> {
        let mut tables = self.tables.write().await;
        if !tables.room_types.contains_key(&room_type_id) {
            return Err(StoreError::not_found("RoomType", room_type_id));
        }
        let now = Utc::now();
        let row = match tables.price_overrides.get(&(room_type_id, date)) {
            Some(existing) => DatePriceOverride {
                price,
                updated_at: now,
                ..existing.clone()
            },
            None => DatePriceOverride {
                id: Uuid::new_v4(),
                room_type_id,
                date,
                price,
                created_at: now,
                updated_at: now,
            },
        };
        tables.price_overrides.insert((room_type_id, date), row.clone());
        Ok(row)
    }

    async fn delete_price_override(&self, room_type_id: Uuid, date: NaiveDate) -> StoreResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .price_overrides
            .remove(&(room_type_id, date))
            .is_some())
    }

    async fn list_bookings(&self, filter: BookingFilter) -> StoreResult<Vec<Booking>> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn find_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn insert_booking_if_available(&self, booking: NewBooking) -> StoreResult<ConditionalInsert> {
        let mut tables = self.tables.write().await;
        if !tables.room_types.contains_key(&booking.room_type_id) {
            return Err(StoreError::not_found("RoomType", booking.room_type_id));
        }

        let now = Utc::now();
        let stored = Booking {
            id: Uuid::new_v4(),
            room_type_id: booking.room_type_id,
            check_in: booking.stay.check_in(),
            check_out: booking.stay.check_out(),
            guest_name: booking.guest_name,
            guest_email: booking.guest_email,
            guest_phone: booking.guest_phone,
            adults: booking.adults,
            children: booking.children,
            special_requests: booking.special_requests,
            status: booking.status,
            total_price: booking.total_price,
            created_at: now,
            updated_at: now,
        };

        if stored.status.is_active() {
            let conflicting = tables.active_conflicts(stored.room_type_id, &stored);
            if !conflicting.is_empty() {
                return Ok(ConditionalInsert::Conflict { conflicting });
            }
        }

        tables.bookings.insert(stored.id, stored.clone());
        Ok(ConditionalInsert::Inserted(stored))
    }

    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<Booking> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .bookings
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Booking", id))?;

        if StatusMachine::reclaims_inventory(existing.status, status) {
            let conflicting = tables.active_conflicts(existing.room_type_id, &existing);
            if !conflicting.is_empty() {
                return Err(StoreError::Conflict(format!(
                    "Booking {} overlaps active booking(s) {:?}",
                    id, conflicting
                )));
            }
        }

        let updated = Booking {
            status,
            updated_at: Utc::now(),
            ..existing
        };
        tables.bookings.insert(id, updated.clone());
        Ok(updated)
    }
}
