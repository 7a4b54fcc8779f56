use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Local;
use printpdf::image_crate::DynamicImage;
use tracing::{error, info, instrument, warn};

use crate::config::CotizacionConfig;
use crate::dto::cotizacion_dto::{CotizacionResponseDto, CreateCotizacionRequest};
use crate::model::cotizacion::Cotizacion;
use crate::model::departamento::Departamento;
use crate::repository::cotizacion_repo::{CotizacionRepository, MongoCotizacionRepository};
use crate::repository::departamento_repo::{DepartamentoRepository, MongoDepartamentoRepository};
use crate::repository::repository_error::RepositoryError;
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::service::pricing;
use crate::util::error::ServiceError;
use crate::util::minio::MinioService;
use crate::util::pdf::{self, PdfError};

/// Rendered proposal ready to be sent as an HTTP response.
#[derive(Debug, Clone)]
pub struct DocumentoPdf {
    pub nombre_archivo: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait CotizacionService: Send + Sync {
    /// Creates and finalizes a quote in one step: validation, number
    /// assignment, price computation, snapshot capture, persistence.
    async fn crear_cotizacion(
        &self,
        dto: CreateCotizacionRequest,
        creado_por: Option<ObjectId>,
    ) -> Result<Cotizacion, ServiceError>;
    async fn get_cotizacion(&self, id: ObjectId) -> Result<CotizacionResponseDto, ServiceError>;
    async fn list_cotizaciones(&self, page: u32, limit: u32)
        -> Result<Vec<Cotizacion>, ServiceError>;
    async fn eliminar_cotizacion(&self, id: ObjectId) -> Result<(), ServiceError>;
    async fn generar_pdf(&self, id: ObjectId) -> Result<DocumentoPdf, ServiceError>;
}

pub struct CotizacionServiceImpl {
    pub cotizacion_repo: MongoCotizacionRepository,
    pub departamento_repo: Arc<MongoDepartamentoRepository>,
    pub user_repo: Arc<UserRepositoryImpl>,
    pub minio_service: Arc<MinioService>,
    pub config: CotizacionConfig,
}

impl CotizacionServiceImpl {
    /// One-time finalization. Validation errors here mean nothing was
    /// persisted: the quote number is drawn only after every check passes.
    /// Calling this on an already-finalized quote changes nothing.
    async fn finalizar(
        &self,
        cotizacion: &mut Cotizacion,
        departamento: &Departamento,
    ) -> Result<(), ServiceError> {
        if cotizacion.esta_finalizada() {
            return Ok(());
        }

        if cotizacion.numero_cotizacion.is_none() {
            let numero = self.cotizacion_repo.siguiente_numero().await?;
            cotizacion.numero_cotizacion = Some(pricing::formatear_numero(numero));
        }

        // Always priced from the unit's live base price; the snapshot below
        // is display-only and never feeds back into pricing.
        cotizacion.precio_final = Some(pricing::calcular_precio_final(
            departamento.precio,
            cotizacion.tipo_descuento,
            cotizacion.valor_descuento,
            self.config.recargo_fijo,
        ));

        if cotizacion.departamento_snapshot.is_none() {
            cotizacion.departamento_snapshot = Some(pricing::capturar_snapshot(
                departamento,
                self.config.recargo_fijo,
            ));
        }

        Ok(())
    }

    /// Fetches and decodes the unit photo for the PDF, bounded by the
    /// configured timeout. Every failure path degrades to `None`: the
    /// proposal ships without its photo page rather than not at all.
    async fn cargar_foto(&self, cotizacion: &Cotizacion) -> Option<DynamicImage> {
        let departamento = match self
            .departamento_repo
            .get_by_id(cotizacion.departamento_id)
            .await
        {
            Ok(d) => d,
            Err(e) => {
                warn!("No se pudo cargar el departamento para la foto: {}", e);
                return None;
            }
        };

        let objeto = departamento.imagen.as_deref()?;

        let descarga = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_foto_secs),
            self.minio_service.get_object(objeto),
        )
        .await;

        let bytes = match descarga {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                warn!("Fallo al descargar la foto '{}': {}", objeto, e);
                return None;
            }
            Err(_) => {
                warn!(
                    "Descarga de foto '{}' excedió el timeout de {}s",
                    objeto, self.config.timeout_foto_secs
                );
                return None;
            }
        };

        match printpdf::image_crate::load_from_memory(&bytes) {
            Ok(imagen) => Some(imagen),
            Err(e) => {
                warn!("Fallo al decodificar la foto '{}': {}", objeto, e);
                None
            }
        }
    }

    async fn nombre_asesor(&self, cotizacion: &Cotizacion) -> Option<String> {
        let id = cotizacion.creado_por.as_ref()?;
        match self.user_repo.find_by_id(id).await {
            Ok(Some(user)) => Some(user.nombre_completo()),
            Ok(None) => None,
            Err(e) => {
                warn!("No se pudo cargar el asesor de la cotización: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl CotizacionService for CotizacionServiceImpl {
    #[instrument(skip(self, dto), fields(dni = %dto.dni_cliente, departamento_id = %dto.departamento_id))]
    async fn crear_cotizacion(
        &self,
        dto: CreateCotizacionRequest,
        creado_por: Option<ObjectId>,
    ) -> Result<Cotizacion, ServiceError> {
        info!("Registrando nueva cotización");

        // Rejected before persistence; no partial quote is ever created.
        if !pricing::validar_dni(&dto.dni_cliente) {
            return Err(ServiceError::InvalidInput(
                "El DNI debe contener exactamente 8 dígitos".to_string(),
            ));
        }

        let departamento_id = ObjectId::parse_str(&dto.departamento_id).map_err(|_| {
            ServiceError::InvalidInput("Identificador de departamento inválido".to_string())
        })?;

        let departamento = self
            .departamento_repo
            .get_by_id(departamento_id)
            .await
            .map_err(|_| {
                ServiceError::InvalidInput("El departamento seleccionado no existe".to_string())
            })?;

        let mut cotizacion = Cotizacion {
            id: None,
            numero_cotizacion: None,
            nombre_cliente: dto.nombre_cliente,
            dni_cliente: dto.dni_cliente,
            direccion_cliente: dto.direccion_cliente,
            distrito_cliente: dto.distrito_cliente,
            telefono_cliente: dto.telefono_cliente,
            email_cliente: dto.email_cliente,
            departamento_id,
            observaciones: dto.observaciones,
            tipo_descuento: dto.tipo_descuento,
            valor_descuento: dto.valor_descuento,
            cuota_inicial: dto.cuota_inicial,
            precio_final: None,
            departamento_snapshot: None,
            fecha_creacion: None,
            creado_por,
            activo: true,
        };

        self.finalizar(&mut cotizacion, &departamento).await?;

        match self.cotizacion_repo.create(cotizacion.clone()).await {
            Ok(creada) => {
                info!(
                    numero = creada.numero_cotizacion.as_deref().unwrap_or("-"),
                    "Cotización creada"
                );
                Ok(creada)
            }
            // A concurrent finalization won the number: retry once with a
            // freshly drawn one. The snapshot and price stay as computed.
            Err(RepositoryError::AlreadyExists(_)) => {
                warn!("Colisión de número de cotización, reintentando con número nuevo");
                let numero = self.cotizacion_repo.siguiente_numero().await?;
                cotizacion.numero_cotizacion = Some(pricing::formatear_numero(numero));
                let creada = self.cotizacion_repo.create(cotizacion).await?;
                info!(
                    numero = creada.numero_cotizacion.as_deref().unwrap_or("-"),
                    "Cotización creada tras reintento"
                );
                Ok(creada)
            }
            Err(e) => {
                error!("Fallo al crear cotización: {}", e);
                Err(ServiceError::from(e))
            }
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_cotizacion(&self, id: ObjectId) -> Result<CotizacionResponseDto, ServiceError> {
        let cotizacion = self.cotizacion_repo.get_by_id(id).await?;

        let imagen_url = match self
            .departamento_repo
            .get_by_id(cotizacion.departamento_id)
            .await
        {
            Ok(departamento) => departamento
                .imagen
                .as_deref()
                .map(|objeto| self.minio_service.generate_download_link(objeto)),
            Err(_) => None,
        };

        Ok(CotizacionResponseDto {
            cotizacion,
            imagen_url,
        })
    }

    #[instrument(skip(self), fields(page, limit))]
    async fn list_cotizaciones(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Cotizacion>, ServiceError> {
        let res = self.cotizacion_repo.list(page, limit).await;
        match &res {
            Ok(cotizaciones) => info!("Se listaron {} cotizaciones", cotizaciones.len()),
            Err(e) => error!("Fallo al listar cotizaciones: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn eliminar_cotizacion(&self, id: ObjectId) -> Result<(), ServiceError> {
        info!("Desactivando cotización");
        let res = self.cotizacion_repo.soft_delete(id).await;
        match &res {
            Ok(_) => info!("Cotización desactivada"),
            Err(e) => error!("Fallo al desactivar cotización: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn generar_pdf(&self, id: ObjectId) -> Result<DocumentoPdf, ServiceError> {
        // Soft-deleted quotes are not reachable through this path.
        let cotizacion = self.cotizacion_repo.get_by_id(id).await?;

        let asesor = self.nombre_asesor(&cotizacion).await;
        let foto = self.cargar_foto(&cotizacion).await;

        let bytes =
            pdf::generar_pdf_cotizacion(&cotizacion, asesor.as_deref(), &self.config, foto)
                .map_err(|e| match e {
                    PdfError::PrecioFaltante => {
                        error!("Cotización {} sin precio final", id);
                        ServiceError::InternalError(
                            "La cotización no tiene precio final calculado".to_string(),
                        )
                    }
                    PdfError::RenderFailed(msg) => {
                        error!("Fallo al generar PDF: {}", msg);
                        ServiceError::InternalError(format!("Fallo al generar PDF: {}", msg))
                    }
                })?;

        let numero = cotizacion
            .numero_cotizacion
            .as_deref()
            .unwrap_or("cotizacion_00");
        Ok(DocumentoPdf {
            nombre_archivo: pdf::nombre_archivo(numero, Local::now()),
            bytes,
        })
    }
}
