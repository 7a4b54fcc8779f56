use crate::config::mongo_conf::MongoConfig;
use crate::model::cotizacion::Cotizacion;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::service::pricing;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};
use futures::stream::StreamExt;
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use tracing::{error, info, warn};

/// Identifier of the quote-number counter inside the `contadores` collection.
const CONTADOR_COTIZACION: &str = "cotizacion";

#[async_trait]
pub trait CotizacionRepository: Send + Sync {
    async fn create(&self, cotizacion: Cotizacion) -> RepositoryResult<Cotizacion>;
    /// Draws the next quote number atomically. Safe under concurrent
    /// finalization: the counter increment is a single-document operation.
    async fn siguiente_numero(&self) -> RepositoryResult<u64>;
    /// Active quotes only; soft-deleted ones are invisible here.
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Cotizacion>;
    /// Active quotes only, newest first.
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Cotizacion>>;
    async fn soft_delete(&self, id: ObjectId) -> RepositoryResult<()>;
    /// Cascade step for unit deletion: hard-deletes every quote of the unit.
    async fn delete_by_departamento(&self, departamento_id: ObjectId) -> RepositoryResult<u64>;
    async fn count(&self) -> RepositoryResult<u64>;
}

pub struct MongoCotizacionRepository {
    collection: mongodb::Collection<Cotizacion>,
    contadores: mongodb::Collection<Document>,
}

impl MongoCotizacionRepository {
    /// Create a new MongoCotizacionRepository using MongoConfig
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        use mongodb::{
            options::{ClientOptions, Credential, ResolverConfig},
            Client,
        };

        let mut client_options =
            ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare())
                .await?;
        client_options.app_name = Some("CotizadorBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout =
            Some(std::time::Duration::from_secs(config.connection_timeout_secs));

        if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database);
        let collection = db.collection::<Cotizacion>(config.get_cotizacion_collection());
        let contadores = db.collection::<Document>("contadores");

        // Quote numbers are globally unique; the index backs the
        // collision-retry discipline.
        let index = IndexModel::builder()
            .keys(doc! { "numero_cotizacion": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index, None).await?;

        let repo = MongoCotizacionRepository {
            collection,
            contadores,
        };
        repo.ensure_contador().await?;
        Ok(repo)
    }

    /// Seeds the counter from the highest already-assigned number, so an
    /// existing dataset keeps its monotonic sequence. A concurrent seed is
    /// harmless: the duplicate insert loses and is ignored.
    async fn ensure_contador(&self) -> Result<(), mongodb::error::Error> {
        let existente = self
            .contadores
            .find_one(doc! { "_id": CONTADOR_COTIZACION }, None)
            .await?;
        if existente.is_some() {
            return Ok(());
        }

        let numeros = self
            .collection
            .distinct("numero_cotizacion", None, None)
            .await?;
        let max = numeros
            .iter()
            .filter_map(|b| match b {
                Bson::String(s) => pricing::parsear_numero(s),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        info!(seed = max, "Seeding cotizacion counter");
        match self
            .contadores
            .insert_one(doc! { "_id": CONTADOR_COTIZACION, "seq": max as i64 }, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("E11000") => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl CotizacionRepository for MongoCotizacionRepository {
    #[tracing::instrument(skip(self, cotizacion), fields(numero = ?cotizacion.numero_cotizacion))]
    async fn create(&self, cotizacion: Cotizacion) -> RepositoryResult<Cotizacion> {
        info!("Creating new cotizacion");
        let mut nueva = cotizacion;
        nueva.id = Some(ObjectId::new());
        if nueva.fecha_creacion.is_none() {
            nueva.fecha_creacion = Some(chrono::Local::now().to_rfc3339());
        }
        nueva.activo = true;

        match self.collection.insert_one(nueva.clone(), None).await {
            Ok(_) => {
                info!("Cotizacion created successfully");
                Ok(nueva)
            }
            Err(e) => {
                error!("Failed to create cotizacion: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn siguiente_numero(&self) -> RepositoryResult<u64> {
        let opts = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let contador = self
            .contadores
            .find_one_and_update(
                doc! { "_id": CONTADOR_COTIZACION },
                doc! { "$inc": { "seq": 1 } },
                opts,
            )
            .await
            .map_err(RepositoryError::from)?
            .ok_or_else(|| {
                RepositoryError::database("Counter document missing after upsert".to_string())
            })?;

        let seq = match contador.get("seq") {
            Some(Bson::Int64(n)) => *n,
            Some(Bson::Int32(n)) => i64::from(*n),
            Some(Bson::Double(n)) => *n as i64,
            _ => {
                return Err(RepositoryError::database(
                    "Counter document has no numeric seq".to_string(),
                ))
            }
        };

        if seq <= 0 {
            return Err(RepositoryError::database(format!(
                "Counter produced non-positive sequence: {}",
                seq
            )));
        }
        Ok(seq as u64)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Cotizacion> {
        let filter = doc! { "_id": id, "activo": true };
        match self.collection.find_one(filter, None).await {
            Ok(Some(cotizacion)) => Ok(cotizacion),
            Ok(None) => Err(RepositoryError::not_found(format!(
                "Cotizacion not found for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to fetch cotizacion by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(page = page, limit = limit))]
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Cotizacion>> {
        let skip = page.saturating_sub(1) * limit;
        let mut cursor = self
            .collection
            .find(doc! { "activo": true }, None)
            .await
            .map_err(RepositoryError::from)?;

        let mut cotizaciones = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(c) => cotizaciones.push(c),
                Err(e) => {
                    error!("Failed to deserialize cotizacion: {}", e);
                    return Err(RepositoryError::from(e));
                }
            }
        }

        cotizaciones.sort_by(|a, b| b.fecha_creacion.cmp(&a.fecha_creacion));
        info!("Fetched {} cotizaciones", cotizaciones.len());
        Ok(cotizaciones
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn soft_delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Soft-deleting cotizacion with ID: {}", id);
        let filter = doc! { "_id": id };
        let update = doc! { "$set": { "activo": false } };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => {
                info!("Cotizacion deactivated for ID: {}", id);
                Ok(())
            }
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No cotizacion found to delete for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to soft-delete cotizacion: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(departamento_id = %departamento_id))]
    async fn delete_by_departamento(&self, departamento_id: ObjectId) -> RepositoryResult<u64> {
        warn!(
            "Cascade-deleting cotizaciones for departamento {}",
            departamento_id
        );
        let filter = doc! { "departamento_id": departamento_id };
        match self.collection.delete_many(filter, None).await {
            Ok(result) => {
                info!(
                    "Deleted {} cotizaciones for departamento {}",
                    result.deleted_count, departamento_id
                );
                Ok(result.deleted_count)
            }
            Err(e) => {
                error!("Failed to cascade-delete cotizaciones: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self) -> RepositoryResult<u64> {
        self.collection
            .count_documents(doc! { "activo": true }, None)
            .await
            .map_err(RepositoryError::from)
    }
}
