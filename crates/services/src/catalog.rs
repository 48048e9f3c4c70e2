//! Service-listing management.

use std::sync::Arc;

use common::{Clock, Money, ServiceId, UserId};
use domain::{DomainError, Role, ServiceListing, UserAccount};
use store::{Store, StoreError};

use crate::internal;

/// Input for publishing a listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub price: Money,
}

/// Manages the provider-facing service catalog.
pub struct CatalogService<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: Store> CatalogService<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Publishes a new listing owned by the provider.
    #[tracing::instrument(skip(self, provider, req), fields(provider_id = %provider.id))]
    pub async fn create(
        &self,
        provider: &UserAccount,
        req: NewListing,
    ) -> Result<ServiceListing, DomainError> {
        if provider.role != Role::Provider {
            return Err(DomainError::forbidden("only providers publish listings"));
        }
        if req.title.trim().is_empty() {
            return Err(DomainError::InvalidRequest("title is required".to_string()));
        }
        if req.price.cents() <= 0 {
            return Err(DomainError::InvalidRequest(
                "price must be positive".to_string(),
            ));
        }

        let listing = ServiceListing::new(provider.id, req.title, req.price, self.clock.now());
        self.store
            .insert_listing(listing.clone())
            .await
            .map_err(internal)?;
        tracing::info!(service_id = %listing.id, "listing published");
        Ok(listing)
    }

    /// Loads one listing.
    pub async fn get(&self, service_id: ServiceId) -> Result<ServiceListing, DomainError> {
        self.store
            .listing(service_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| DomainError::not_found("service", service_id))
    }

    /// A provider's listings, oldest first.
    pub async fn list_for_provider(
        &self,
        provider_id: UserId,
    ) -> Result<Vec<ServiceListing>, DomainError> {
        self.store
            .listings_for_provider(provider_id)
            .await
            .map_err(internal)
    }

    /// Enables or disables a listing.
    ///
    /// The owning provider may toggle their own listing; admins may toggle
    /// any. Disabling stops new bookings without touching existing ones.
    pub async fn set_active(
        &self,
        caller: &UserAccount,
        service_id: ServiceId,
        active: bool,
    ) -> Result<ServiceListing, DomainError> {
        self.require_owner_or_admin(caller, service_id).await?;
        match self.store.set_listing_active(service_id, active).await {
            Ok(listing) => {
                tracing::info!(service_id = %listing.id, active, "listing toggled");
                Ok(listing)
            }
            Err(e) => Err(map_missing(e, service_id)),
        }
    }

    /// Updates the listed price. Bookings already made keep their snapshot.
    pub async fn set_price(
        &self,
        caller: &UserAccount,
        service_id: ServiceId,
        price: Money,
    ) -> Result<ServiceListing, DomainError> {
        if price.cents() <= 0 {
            return Err(DomainError::InvalidRequest(
                "price must be positive".to_string(),
            ));
        }
        self.require_owner_or_admin(caller, service_id).await?;
        self.store
            .set_listing_price(service_id, price)
            .await
            .map_err(|e| map_missing(e, service_id))
    }

    async fn require_owner_or_admin(
        &self,
        caller: &UserAccount,
        service_id: ServiceId,
    ) -> Result<(), DomainError> {
        let listing = self.get(service_id).await?;
        if caller.role != Role::Admin && listing.provider_id != caller.id {
            return Err(DomainError::forbidden("not the owner of this listing"));
        }
        Ok(())
    }
}

fn map_missing(err: StoreError, service_id: ServiceId) -> DomainError {
    match err {
        StoreError::NotFound { .. } => DomainError::not_found("service", service_id),
        e => internal(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use store::InMemoryStore;

    fn accounts() -> (UserAccount, UserAccount, UserAccount) {
        let now = Utc::now();
        (
            UserAccount::new("P", "p@example.com", "h", Role::Provider, now),
            UserAccount::new("C", "c@example.com", "h", Role::Customer, now),
            UserAccount::new("A", "a@example.com", "h", Role::Admin, now),
        )
    }

    fn service() -> CatalogService<InMemoryStore> {
        CatalogService::new(InMemoryStore::new(), Arc::new(common::SystemClock))
    }

    fn request() -> NewListing {
        NewListing {
            title: "Gutter cleaning".to_string(),
            price: Money::from_cents(7500),
        }
    }

    #[tokio::test]
    async fn test_provider_publishes_listing() {
        let catalog = service();
        let (provider, _, _) = accounts();

        let listing = catalog.create(&provider, request()).await.unwrap();
        assert!(listing.active);
        assert_eq!(listing.provider_id, provider.id);
        assert_eq!(catalog.list_for_provider(provider.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_customer_cannot_publish() {
        let catalog = service();
        let (_, customer, _) = accounts();

        let err = catalog.create(&customer, request()).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_zero_price_rejected() {
        let catalog = service();
        let (provider, _, _) = accounts();

        let mut req = request();
        req.price = Money::from_cents(0);
        let err = catalog.create(&provider, req).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_only_owner_or_admin_toggles() {
        let catalog = service();
        let (provider, customer, admin) = accounts();
        let listing = catalog.create(&provider, request()).await.unwrap();

        let err = catalog
            .set_active(&customer, listing.id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let off = catalog.set_active(&admin, listing.id, false).await.unwrap();
        assert!(!off.active);
        let on = catalog.set_active(&provider, listing.id, true).await.unwrap();
        assert!(on.active);
    }

    #[tokio::test]
    async fn test_missing_listing_not_found() {
        let catalog = service();
        let (provider, _, _) = accounts();

        let err = catalog
            .set_price(&provider, ServiceId::new(), Money::from_cents(100))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
