use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument, warn};

use crate::dto::departamento_dto::{
    CreateDepartamentoRequest, DepartamentoResponseDto, UpdateDepartamentoRequest,
};
use crate::model::departamento::Departamento;
use crate::repository::cotizacion_repo::{CotizacionRepository, MongoCotizacionRepository};
use crate::repository::departamento_repo::{DepartamentoRepository, MongoDepartamentoRepository};
use crate::util::error::ServiceError;
use crate::util::minio::MinioService;

#[async_trait]
pub trait DepartamentoService: Send + Sync {
    async fn crear_departamento(
        &self,
        dto: CreateDepartamentoRequest,
    ) -> Result<Departamento, ServiceError>;
    async fn get_departamento(&self, id: ObjectId) -> Result<DepartamentoResponseDto, ServiceError>;
    async fn editar_departamento(
        &self,
        id: ObjectId,
        dto: UpdateDepartamentoRequest,
    ) -> Result<Departamento, ServiceError>;
    /// Irreversible: deletes the unit AND every quote that references it.
    async fn eliminar_departamento(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn list_departamentos(&self) -> Result<Vec<Departamento>, ServiceError>;
    async fn subir_imagen(
        &self,
        id: ObjectId,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, ServiceError>;
}

pub struct DepartamentoServiceImpl {
    pub departamento_repo: Arc<MongoDepartamentoRepository>,
    pub cotizacion_repo: Arc<MongoCotizacionRepository>,
    pub minio_service: Arc<MinioService>,
}

fn departamento_from_dto(dto: CreateDepartamentoRequest) -> Departamento {
    Departamento {
        id: None,
        codigo: dto.codigo,
        nombre: dto.nombre,
        descripcion: dto.descripcion,
        precio: dto.precio,
        area_m2: dto.area_m2,
        area_libre: dto.area_libre,
        habitaciones: dto.habitaciones,
        banos: dto.banos,
        pisos: dto.pisos,
        disponible: dto.disponible,
        estado: dto.estado,
        imagen: None,
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl DepartamentoService for DepartamentoServiceImpl {
    #[instrument(skip(self, dto), fields(codigo = %dto.codigo))]
    async fn crear_departamento(
        &self,
        dto: CreateDepartamentoRequest,
    ) -> Result<Departamento, ServiceError> {
        info!("Registrando nuevo departamento");
        let res = self.departamento_repo.create(departamento_from_dto(dto)).await;
        match &res {
            Ok(d) => info!(codigo = %d.codigo, "Departamento creado"),
            Err(e) => error!("Fallo al crear departamento: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_departamento(
        &self,
        id: ObjectId,
    ) -> Result<DepartamentoResponseDto, ServiceError> {
        let departamento = self.departamento_repo.get_by_id(id).await?;
        let imagen_url = departamento
            .imagen
            .as_deref()
            .map(|objeto| self.minio_service.generate_download_link(objeto));
        Ok(DepartamentoResponseDto {
            departamento,
            imagen_url,
        })
    }

    #[instrument(skip(self, dto), fields(id = %id))]
    async fn editar_departamento(
        &self,
        id: ObjectId,
        dto: UpdateDepartamentoRequest,
    ) -> Result<Departamento, ServiceError> {
        info!("Actualizando departamento");

        // The photo path survives edits; it has its own upload endpoint.
        let actual = self.departamento_repo.get_by_id(id).await?;
        let mut actualizado = departamento_from_dto(dto);
        actualizado.id = actual.id;
        actualizado.imagen = actual.imagen;
        actualizado.created_at = actual.created_at;

        let res = self.departamento_repo.update(id, actualizado).await;
        match &res {
            Ok(_) => info!("Departamento actualizado"),
            Err(e) => error!("Fallo al actualizar departamento: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn eliminar_departamento(&self, id: ObjectId) -> Result<(), ServiceError> {
        // Cascade first: a unit must never disappear while its quotes
        // still point at it.
        let departamento = self.departamento_repo.get_by_id(id).await?;

        let eliminadas = self.cotizacion_repo.delete_by_departamento(id).await?;
        if eliminadas > 0 {
            warn!(
                "Se eliminaron {} cotizaciones junto con el departamento {}",
                eliminadas, departamento.codigo
            );
        }

        self.departamento_repo.delete(id).await?;

        if let Some(objeto) = departamento.imagen.as_deref() {
            if let Err(e) = self.minio_service.remove_object(objeto).await {
                warn!("No se pudo eliminar la foto '{}': {}", objeto, e);
            }
        }

        info!(codigo = %departamento.codigo, "Departamento eliminado");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_departamentos(&self) -> Result<Vec<Departamento>, ServiceError> {
        let res = self.departamento_repo.list().await;
        match &res {
            Ok(departamentos) => info!("Se listaron {} departamentos", departamentos.len()),
            Err(e) => error!("Fallo al listar departamentos: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, data), fields(id = %id, filename = %filename, size = data.len()))]
    async fn subir_imagen(
        &self,
        id: ObjectId,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, ServiceError> {
        info!("Subiendo imagen de departamento");

        // The unit must exist before we store anything for it.
        let departamento = self.departamento_repo.get_by_id(id).await?;

        let uuid = uuid::Uuid::new_v4().to_string();
        let extension = filename
            .rsplit('.')
            .next()
            .filter(|s| *s != filename)
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        let object_name = format!("departamentos/{}/{}{}", id, uuid, extension);

        self.minio_service
            .put_object(&object_name, data, Some(content_type))
            .await
            .map_err(|e| ServiceError::InternalError(format!("MinIO upload error: {e}")))?;

        self.departamento_repo.set_imagen(id, &object_name).await?;

        // Best effort: replace, don't accumulate, old photos
        if let Some(anterior) = departamento.imagen.as_deref() {
            if let Err(e) = self.minio_service.remove_object(anterior).await {
                warn!("No se pudo eliminar la foto anterior '{}': {}", anterior, e);
            }
        }

        info!("Imagen subida como '{}'", object_name);
        Ok(object_name)
    }
}
