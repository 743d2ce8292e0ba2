use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::client::{
        self, ActiveModel as ClientActiveModel, Entity as ClientEntity, Model as ClientModel,
    },
    entities::delivery_address::{
        Entity as DeliveryAddressEntity, Model as DeliveryAddressModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, message = "Client name is required"))]
    pub name: String,
    pub short_name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub tax_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
    pub id: Uuid,
    pub client_number: i32,
    pub name: String,
    pub short_name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub tax_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientListResponse {
    pub clients: Vec<ClientResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeliveryAddressResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub label: String,
    pub company: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
}

/// Service for the client register and its delivery-address book.
#[derive(Clone)]
pub struct ClientService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl ClientService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Registers a client, assigning the next free client number.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_client(
        &self,
        request: CreateClientRequest,
    ) -> Result<ClientResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db_pool;

        // Client numbers are sequential and never reused.
        let highest: Option<i32> = ClientEntity::find()
            .select_only()
            .column(client::Column::ClientNumber)
            .order_by_desc(client::Column::ClientNumber)
            .limit(1)
            .into_tuple()
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let client_number = highest.unwrap_or(0) + 1;

        let now = Utc::now();
        let active_model = ClientActiveModel {
            id: Set(Uuid::new_v4()),
            client_number: Set(client_number),
            name: Set(request.name),
            short_name: Set(request.short_name),
            contact_person: Set(request.contact_person),
            phone: Set(request.phone),
            email: Set(request.email),
            street: Set(request.street),
            postal_code: Set(request.postal_code),
            city: Set(request.city),
            tax_id: Set(request.tax_id),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let model = active_model.insert(db).await.map_err(|e| {
            error!(error = %e, "Failed to create client");
            ServiceError::DatabaseError(e)
        })?;

        info!(client_id = %model.id, client_number, "Client created");
        self.emit(Event::ClientCreated(model.id)).await;

        Ok(model_to_response(model))
    }

    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn get_client(&self, client_id: Uuid) -> Result<Option<ClientResponse>, ServiceError> {
        let client = ClientEntity::find_by_id(client_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(client.map(model_to_response))
    }

    /// Lists clients in register order (by client number).
    #[instrument(skip(self))]
    pub async fn list_clients(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<ClientListResponse, ServiceError> {
        let paginator = ClientEntity::find()
            .order_by_asc(client::Column::ClientNumber)
            .paginate(&*self.db_pool, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let clients = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(ClientListResponse {
            clients: clients.into_iter().map(model_to_response).collect(),
            total,
            page,
            per_page,
        })
    }

    /// All clients at once, for views that join orders against them.
    pub async fn list_all(&self) -> Result<Vec<ClientModel>, ServiceError> {
        ClientEntity::find()
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Saved delivery addresses of one client.
    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn list_delivery_addresses(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<DeliveryAddressResponse>, ServiceError> {
        let client = ClientEntity::find_by_id(client_id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Client {} not found", client_id)))?;

        let addresses = client
            .find_related(DeliveryAddressEntity)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(addresses.into_iter().map(address_to_response).collect())
    }

    async fn emit(&self, event: Event) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(event).await {
                warn!("Failed to send event: {}", e);
            }
        }
    }
}

fn model_to_response(model: ClientModel) -> ClientResponse {
    ClientResponse {
        id: model.id,
        client_number: model.client_number,
        name: model.name,
        short_name: model.short_name,
        contact_person: model.contact_person,
        phone: model.phone,
        email: model.email,
        street: model.street,
        postal_code: model.postal_code,
        city: model.city,
        tax_id: model.tax_id,
    }
}

fn address_to_response(model: DeliveryAddressModel) -> DeliveryAddressResponse {
    DeliveryAddressResponse {
        id: model.id,
        client_id: model.client_id,
        label: model.label,
        company: model.company,
        street: model.street,
        postal_code: model.postal_code,
        city: model.city,
        contact_person: model.contact_person,
        phone: model.phone,
    }
}
