use std::sync::Arc;

use log::{info, trace};

use super::FacadeError;
use crate::{
    query::{Insert, Select, Update, embed},
    repo::RelationalStore,
    types::{self, Listing, Row, Table},
};

pub const CLIENTE_FIELDS: &[&str] = &["nombre", "correo", "telefono", "contrasena"];
pub const FREELANCER_FIELDS: &[&str] = &["nombre", "telefono", "correo", "contrasena", "biografia"];
pub const PROYECTO_FIELDS: &[&str] = &["titulo", "descripcion", "presupuesto", "id_cliente"];
pub const HABILIDAD_FIELDS: &[&str] = &["nombre"];
pub const APLICACION_FIELDS: &[&str] = &["id_freelancer", "id_proyecto", "mensaje_propuesta"];
pub const FREELANCER_HABILIDAD_FIELDS: &[&str] =
    &["id_freelancer", "id_habilidad", "anios_experiencia", "nivel"];
/// The only column that can be changed on an existing application
pub const APLICACION_PATCH_FIELDS: &[&str] = &["estado"];

/// Facade exposing the marketplace tables, one operation per entity and access pattern.
///
/// Store failures are never handled here, they are returned to the caller as
/// [`FacadeError`]. There are no retries.
pub struct FacadeMarketplace<S> {
    store: Arc<S>,
}

impl<S> Clone for FacadeMarketplace<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: RelationalStore> FacadeMarketplace<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Clientes

    pub async fn clientes(&self) -> Result<Listing, FacadeError> {
        self.list("clientes", &select_clientes()).await
    }

    pub async fn cliente(&self, id: &str) -> Result<Row, FacadeError> {
        self.single(&select_cliente(id)).await
    }

    pub async fn create_cliente(&self, body: &Row) -> Result<Vec<Row>, FacadeError> {
        self.create(Table::Clientes, body, CLIENTE_FIELDS).await
    }

    // -------------------------------------------------------------------------
    // Freelancers

    pub async fn freelancers(&self) -> Result<Listing, FacadeError> {
        self.list("freelancers", &select_freelancers()).await
    }

    pub async fn freelancer(&self, id: &str) -> Result<Row, FacadeError> {
        self.single(&select_freelancer(id)).await
    }

    pub async fn create_freelancer(&self, body: &Row) -> Result<Vec<Row>, FacadeError> {
        self.create(Table::Freelancers, body, FREELANCER_FIELDS).await
    }

    // -------------------------------------------------------------------------
    // Proyectos

    pub async fn proyectos(&self) -> Result<Listing, FacadeError> {
        self.list("proyectos", &select_proyectos()).await
    }

    pub async fn proyecto(&self, id: &str) -> Result<Row, FacadeError> {
        self.single(&select_proyecto(id)).await
    }

    pub async fn create_proyecto(&self, body: &Row) -> Result<Vec<Row>, FacadeError> {
        self.create(Table::Proyectos, body, PROYECTO_FIELDS).await
    }

    // -------------------------------------------------------------------------
    // Habilidades

    pub async fn habilidades(&self) -> Result<Listing, FacadeError> {
        self.list("habilidades", &select_habilidades()).await
    }

    pub async fn create_habilidad(&self, body: &Row) -> Result<Vec<Row>, FacadeError> {
        self.create(Table::Habilidades, body, HABILIDAD_FIELDS).await
    }

    // -------------------------------------------------------------------------
    // Aplicaciones

    pub async fn aplicaciones(&self) -> Result<Listing, FacadeError> {
        self.list("aplicaciones", &select_aplicaciones()).await
    }

    pub async fn create_aplicacion(&self, body: &Row) -> Result<Vec<Row>, FacadeError> {
        self.create(Table::Aplicaciones, body, APLICACION_FIELDS).await
    }

    /// Changes the `estado` of an application. Last writer wins.
    pub async fn update_aplicacion_estado(
        &self,
        id: &str,
        body: &Row,
    ) -> Result<Vec<Row>, FacadeError> {
        info!("updating aplicacion `{id}`");

        let update = update_aplicacion(id, body);
        let rows = self.store.update(&update).await?;

        trace!("{} rows updated", rows.len());
        Ok(rows)
    }

    // -------------------------------------------------------------------------
    // Freelancer - habilidades

    pub async fn freelancer_habilidades(&self) -> Result<Listing, FacadeError> {
        self.list("relaciones", &select_freelancer_habilidades())
            .await
    }

    pub async fn create_freelancer_habilidad(&self, body: &Row) -> Result<Vec<Row>, FacadeError> {
        self.create(Table::FreelancerHabilidad, body, FREELANCER_HABILIDAD_FIELDS)
            .await
    }

    async fn list(&self, key: &'static str, select: &Select) -> Result<Listing, FacadeError> {
        info!("listing {}", select.table());

        let rows = self.store.select(select).await?;

        trace!("found {} rows in {}", rows.len(), select.table());
        Ok(Listing::new(key, rows))
    }

    async fn single(&self, select: &Select) -> Result<Row, FacadeError> {
        info!("fetching single row from {}", select.table());
        Ok(self.store.select_single(select).await?)
    }

    async fn create(
        &self,
        table: Table,
        body: &Row,
        fields: &[&str],
    ) -> Result<Vec<Row>, FacadeError> {
        info!("inserting into {table}");

        let insert = Insert::row(table, types::pick(body, fields));
        let rows = self.store.insert(&insert).await?;

        trace!("{} rows inserted into {table}", rows.len());
        Ok(rows)
    }
}

pub fn select_clientes() -> Select {
    Select::from(Table::Clientes)
}

pub fn select_cliente(id: &str) -> Select {
    Select::from(Table::Clientes).eq("id_cliente", id)
}

pub fn select_freelancers() -> Select {
    Select::from(Table::Freelancers)
}

pub fn select_freelancer(id: &str) -> Select {
    Select::from(Table::Freelancers)
        .embed(
            embed(Table::FreelancerHabilidad)
                .columns(&["anios_experiencia", "nivel"])
                .embed(embed(Table::Habilidades).columns(&["nombre"])),
        )
        .eq("id_freelancer", id)
}

pub fn select_proyectos() -> Select {
    Select::from(Table::Proyectos).embed(embed(Table::Clientes).columns(&["nombre", "correo"]))
}

pub fn select_proyecto(id: &str) -> Select {
    Select::from(Table::Proyectos)
        .embed(embed(Table::Clientes).columns(&["nombre", "correo", "telefono"]))
        .embed(
            embed(Table::Aplicaciones)
                .columns(&["id_aplicacion", "estado", "mensaje_propuesta"])
                .embed(embed(Table::Freelancers).columns(&["nombre", "correo"])),
        )
        .eq("id_proyecto", id)
}

pub fn select_habilidades() -> Select {
    Select::from(Table::Habilidades)
}

pub fn select_aplicaciones() -> Select {
    Select::from(Table::Aplicaciones)
        .embed(embed(Table::Freelancers).columns(&["nombre", "correo"]))
        .embed(
            embed(Table::Proyectos)
                .columns(&["titulo", "presupuesto"])
                .embed(embed(Table::Clientes).columns(&["nombre"])),
        )
}

pub fn select_freelancer_habilidades() -> Select {
    Select::from(Table::FreelancerHabilidad)
        .embed(embed(Table::Freelancers).columns(&["nombre", "correo"]))
        .embed(embed(Table::Habilidades).columns(&["nombre"]))
}

pub fn update_aplicacion(id: &str, body: &Row) -> Update {
    Update::set(Table::Aplicaciones, types::pick(body, APLICACION_PATCH_FIELDS))
        .eq("id_aplicacion", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::SelectQueryBuilder,
        repo::{ErrorKind, NOT_SINGLE_ROW, testing::MemoryStore},
    };
    use serde_json::{Value, json};

    fn body(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    fn facade() -> FacadeMarketplace<MemoryStore> {
        FacadeMarketplace::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn every_request_compiles() {
        let selects = [
            select_clientes(),
            select_cliente("1"),
            select_freelancers(),
            select_freelancer("1"),
            select_proyectos(),
            select_proyecto("1"),
            select_habilidades(),
            select_aplicaciones(),
            select_freelancer_habilidades(),
        ];
        for select in &selects {
            SelectQueryBuilder::build(select).unwrap();
        }
    }

    #[tokio::test]
    async fn create_then_get_cliente() {
        let facade = facade();

        let created = facade
            .create_cliente(&body(json!({
                "nombre": "Ana",
                "correo": "ana@x.com",
                "telefono": "555",
                "contrasena": "pw",
                "rol": "admin"
            })))
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        let row = &created[0];
        assert_eq!(row["nombre"], "Ana");
        assert_eq!(row["correo"], "ana@x.com");
        assert!(row.get("rol").is_none());

        let id = row["id_cliente"].to_string();
        let fetched = facade.cliente(&id).await.unwrap();
        assert_eq!(&fetched, row);
    }

    #[tokio::test]
    async fn missing_row_is_a_store_failure() {
        let err = facade().cliente("42").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), NOT_SINGLE_ROW);
    }

    #[tokio::test]
    async fn listing_totals_match_rows() {
        let facade = facade();
        for nombre in ["Rust", "SQL", "Diseño"] {
            facade
                .create_habilidad(&body(json!({ "nombre": nombre })))
                .await
                .unwrap();
        }

        let listing = facade.habilidades().await.unwrap();
        assert_eq!(listing.total(), 3);
        assert_eq!(listing.total(), listing.rows().len());
        assert_eq!(listing.key(), "habilidades");

        assert_eq!(facade.freelancer_habilidades().await.unwrap().key(), "relaciones");
    }

    #[tokio::test]
    async fn freelancer_embeds_skills() {
        let facade = facade();
        facade
            .create_freelancer(&body(json!({
                "nombre": "Luis", "correo": "luis@x.com", "contrasena": "pw", "biografia": "dev"
            })))
            .await
            .unwrap();
        facade
            .create_habilidad(&body(json!({"nombre": "Rust"})))
            .await
            .unwrap();
        facade
            .create_freelancer_habilidad(&body(json!({
                "id_freelancer": 1, "id_habilidad": 1, "anios_experiencia": 4, "nivel": "avanzado"
            })))
            .await
            .unwrap();

        let freelancer = facade.freelancer("1").await.unwrap();
        assert_eq!(
            freelancer["freelancer_habilidad"],
            json!([{"anios_experiencia": 4, "nivel": "avanzado", "habilidades": {"nombre": "Rust"}}])
        );
    }

    #[tokio::test]
    async fn patch_only_changes_estado() {
        let facade = facade();
        facade
            .create_freelancer(&body(json!({"nombre": "Luis", "correo": "l@x.com", "contrasena": "pw"})))
            .await
            .unwrap();
        facade
            .create_cliente(&body(json!({"nombre": "Ana", "correo": "a@x.com", "contrasena": "pw"})))
            .await
            .unwrap();
        facade
            .create_proyecto(&body(json!({"titulo": "Web", "presupuesto": 900, "id_cliente": 1})))
            .await
            .unwrap();
        let before = facade
            .create_aplicacion(&body(json!({
                "id_freelancer": 1, "id_proyecto": 1, "mensaje_propuesta": "hola"
            })))
            .await
            .unwrap()
            .remove(0);

        let after = facade
            .update_aplicacion_estado(
                "1",
                &body(json!({"estado": "aceptado", "mensaje_propuesta": "cambiado"})),
            )
            .await
            .unwrap()
            .remove(0);

        assert_eq!(after["estado"], "aceptado");
        assert_eq!(after["mensaje_propuesta"], before["mensaje_propuesta"]);
        assert_eq!(after["id_proyecto"], before["id_proyecto"]);

        // no estado in the body: nothing is updated nor returned
        let unchanged = facade
            .update_aplicacion_estado("1", &body(json!({"mensaje_propuesta": "otro"})))
            .await
            .unwrap();
        assert!(unchanged.is_empty());
        assert_eq!(facade.aplicaciones().await.unwrap().rows()[0]["estado"], "aceptado");

        // unknown id: no rows
        let none = facade
            .update_aplicacion_estado("9", &body(json!({"estado": "rechazado"})))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn aplicacion_with_unknown_freelancer_fails() {
        let err = facade()
            .create_aplicacion(&body(json!({
                "id_freelancer": 7, "id_proyecto": 1, "mensaje_propuesta": "hola"
            })))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    }
}
