use crate::config::mongo_conf::MongoConfig;
use crate::model::departamento::Departamento;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::{options::IndexOptions, IndexModel};
use tracing::{error, info};

#[async_trait]
pub trait DepartamentoRepository: Send + Sync {
    async fn create(&self, departamento: Departamento) -> RepositoryResult<Departamento>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Departamento>;
    async fn update(&self, id: ObjectId, departamento: Departamento) -> RepositoryResult<Departamento>;
    async fn set_imagen(&self, id: ObjectId, imagen: &str) -> RepositoryResult<()>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(&self) -> RepositoryResult<Vec<Departamento>>;
}

pub struct MongoDepartamentoRepository {
    collection: mongodb::Collection<Departamento>,
}

impl MongoDepartamentoRepository {
    /// Create a new MongoDepartamentoRepository using MongoConfig
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
        let collection = db.collection::<Departamento>(config.get_departamento_collection());

        // Inventory codes are unique
        let index = IndexModel::builder()
            .keys(doc! { "codigo": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index, None).await?;

        Ok(MongoDepartamentoRepository { collection })
    }
}

#[async_trait]
impl DepartamentoRepository for MongoDepartamentoRepository {
    #[tracing::instrument(skip(self, departamento), fields(codigo = %departamento.codigo))]
    async fn create(&self, departamento: Departamento) -> RepositoryResult<Departamento> {
        info!("Creating new departamento");
        let mut nuevo = departamento;
        nuevo.id = Some(ObjectId::new());
        let now = chrono::Local::now().to_rfc3339();
        nuevo.created_at = Some(now.clone());
        nuevo.updated_at = Some(now);

        match self.collection.insert_one(nuevo.clone(), None).await {
            Ok(_) => {
                info!("Departamento created successfully");
                Ok(nuevo)
            }
            Err(e) => {
                error!("Failed to create departamento: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Departamento> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(departamento)) => Ok(departamento),
            Ok(None) => Err(RepositoryError::not_found(format!(
                "Departamento not found for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to fetch departamento by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, departamento), fields(id = %id))]
    async fn update(&self, id: ObjectId, departamento: Departamento) -> RepositoryResult<Departamento> {
        info!("Updating departamento with ID: {}", id);
        let filter = doc! { "_id": id };
        let mut actualizado = departamento;
        actualizado.updated_at = Some(chrono::Local::now().to_rfc3339());

        let mut doc = bson::to_document(&actualizado)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize departamento: {}", e)))?;
        doc.remove("_id");
        let update = doc! { "$set": doc };

        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => {
                info!("Departamento updated successfully for ID: {}", id);
                Ok(actualizado)
            }
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No departamento found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update departamento: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id, imagen = %imagen))]
    async fn set_imagen(&self, id: ObjectId, imagen: &str) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": {
            "imagen": imagen,
            "updated_at": chrono::Local::now().to_rfc3339(),
        }};
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No departamento found to set imagen for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to set imagen: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting departamento with ID: {}", id);
        let filter = doc! { "_id": id };
        match self.collection.delete_one(filter, None).await {
            Ok(result) if result.deleted_count > 0 => {
                info!("Departamento deleted successfully for ID: {}", id);
                Ok(())
            }
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No departamento found to delete for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to delete departamento: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> RepositoryResult<Vec<Departamento>> {
        let mut cursor = self
            .collection
            .find(None, None)
            .await
            .map_err(RepositoryError::from)?;

        let mut departamentos = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(d) => departamentos.push(d),
                Err(e) => {
                    error!("Failed to deserialize departamento: {}", e);
                    return Err(RepositoryError::from(e));
                }
            }
        }
        departamentos.sort_by(|a, b| a.codigo.cmp(&b.codigo));
        info!("Fetched {} departamentos", departamentos.len());
        Ok(departamentos)
    }
}
