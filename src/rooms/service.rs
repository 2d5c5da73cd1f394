use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::rooms::{
    CreateRoomTypeRequest, DatePriceOverride, RoomError, RoomType, RoomTypePatch, SetDatePriceRequest,
    UpdateRoomTypeRequest,
};
use crate::store::{DataStore, StoreError};
use crate::validation::validate_price;

/// Service for room type management and per-date pricing
#[derive(Clone)]
pub struct RoomService {
    store: Arc<dyn DataStore>,
}

impl RoomService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<RoomType>, RoomError> {
        Ok(self.store.list_room_types().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<RoomType, RoomError> {
        self.store
            .find_room_type(id)
            .await?
            .ok_or(RoomError::NotFound(id))
    }

    pub async fn create(&self, request: CreateRoomTypeRequest) -> Result<RoomType, RoomError> {
        request.validate()?;
        let room_type = self.store.insert_room_type(request.into()).await?;
        info!(room_type_id = %room_type.id, name = %room_type.name, "Room type created");
        Ok(room_type)
    }

    /// Apply a partial update
    ///
    /// An explicit `null` weekend price clears it, so weekend nights fall back
    /// to the base price.
    pub async fn update(&self, id: Uuid, request: UpdateRoomTypeRequest) -> Result<RoomType, RoomError> {
        request.validate()?;
        if let Some(Some(weekend_price)) = request.weekend_price {
            if let Err(error) = validate_price(&weekend_price) {
                let mut errors = ValidationErrors::new();
                errors.add("weekend_price", error);
                return Err(RoomError::Validation(errors));
            }
        }

        let patch = RoomTypePatch::from(request);
        let updated = self
            .store
            .update_room_type(id, patch)
            .await
            .map_err(|err| match err {
                StoreError::NotFound { .. } => RoomError::NotFound(id),
                other => other.into(),
            })?;

        info!(room_type_id = %id, "Room type updated");
        Ok(updated)
    }

    /// Delete a room type and its overrides
    ///
    /// Refused with `Conflict` while bookings still reference it.
    pub async fn delete(&self, id: Uuid) -> Result<(), RoomError> {
        let deleted = self.store.delete_room_type(id).await.map_err(|err| match err {
            StoreError::Conflict(message) => RoomError::Conflict(message),
            other => other.into(),
        })?;

        if !deleted {
            return Err(RoomError::NotFound(id));
        }

        info!(room_type_id = %id, "Room type deleted");
        Ok(())
    }

    /// Overrides of one room type in `[from, to)`, ordered by date
    pub async fn list_prices(
        &self,
        room_type_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DatePriceOverride>, RoomError> {
        if to <= from {
            return Err(RoomError::InvalidRange { from, to });
        }
        self.get(room_type_id).await?;

        let overrides = self.store.list_price_overrides(room_type_id, from, to).await?;
        debug!(%room_type_id, count = overrides.len(), "Listed price overrides");
        Ok(overrides)
    }

    /// Pin a price to one date, replacing any existing override for that date
    pub async fn set_price(
        &self,
        room_type_id: Uuid,
        date: NaiveDate,
        request: SetDatePriceRequest,
    ) -> Result<DatePriceOverride, RoomError> {
        request.validate()?;

        let row = self
            .store
            .upsert_price_override(room_type_id, date, request.price)
            .await
            .map_err(|err| match err {
                StoreError::NotFound { .. } => RoomError::NotFound(room_type_id),
                other => other.into(),
            })?;

        info!(%room_type_id, %date, price = %row.price, "Price override set");
        Ok(row)
    }

    pub async fn clear_price(&self, room_type_id: Uuid, date: NaiveDate) -> Result<(), RoomError> {
        if !self.store.delete_price_override(room_type_id, date).await? {
            return Err(RoomError::OverrideNotFound { room_type_id, date });
        }

        info!(%room_type_id, %date, "Price override removed");
        Ok(())
    }
}
