use std::time::Instant;

use log::{debug, info};
use serde::Serialize;

use super::{FacadeError, FacadeMarketplace};
use crate::{
    query::{Select, embed},
    repo::RelationalStore,
    types::{Row, SchemaDescription, Table, schema_description},
};

const DUMP_MESSAGE: &str = "Información completa de todas las tablas";

/// Full contents of every table, with per-table counts.
#[derive(Debug, Serialize)]
pub struct TablesDump {
    pub mensaje: &'static str,
    pub estadisticas: TablesStats,
    pub datos: TablesData,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TablesStats {
    pub total_clientes: usize,
    pub total_freelancers: usize,
    pub total_proyectos: usize,
    pub total_habilidades: usize,
    pub total_aplicaciones: usize,
    pub total_relaciones_habilidades: usize,
}

#[derive(Debug, Serialize)]
pub struct TablesData {
    pub clientes: Vec<Row>,
    pub freelancers: Vec<Row>,
    pub proyectos: Vec<Row>,
    pub habilidades: Vec<Row>,
    pub aplicaciones: Vec<Row>,
    pub freelancer_habilidad: Vec<Row>,
}

impl From<TablesData> for TablesDump {
    fn from(datos: TablesData) -> Self {
        Self {
            mensaje: DUMP_MESSAGE,
            estadisticas: TablesStats {
                total_clientes: datos.clientes.len(),
                total_freelancers: datos.freelancers.len(),
                total_proyectos: datos.proyectos.len(),
                total_habilidades: datos.habilidades.len(),
                total_aplicaciones: datos.aplicaciones.len(),
                total_relaciones_habilidades: datos.freelancer_habilidad.len(),
            },
            datos,
        }
    }
}

/// Store requests issued by the dump, one per table in [`Table::ALL`] order.
pub fn dump_selects() -> [Select; 6] {
    [
        Select::from(Table::Clientes),
        Select::from(Table::Freelancers),
        Select::from(Table::Proyectos).embed(embed(Table::Clientes).columns(&["nombre", "correo"])),
        Select::from(Table::Habilidades),
        Select::from(Table::Aplicaciones)
            .embed(embed(Table::Freelancers).columns(&["nombre", "correo"]))
            .embed(embed(Table::Proyectos).columns(&["titulo"])),
        Select::from(Table::FreelancerHabilidad)
            .embed(embed(Table::Freelancers).columns(&["nombre"]))
            .embed(embed(Table::Habilidades).columns(&["nombre"])),
    ]
}

impl<S: RelationalStore> FacadeMarketplace<S> {
    /// Reads every table concurrently.
    ///
    /// The six requests are issued together and the call resumes only once all of them
    /// have completed. Results are then checked in table order: the first failure is
    /// returned and no partial dump is produced.
    pub async fn dump(&self) -> Result<TablesDump, FacadeError> {
        info!("dumping all tables");
        let start = Instant::now();

        let [clientes, freelancers, proyectos, habilidades, aplicaciones, relaciones] =
            dump_selects();
        let store = self.store();

        let results = futures::join!(
            store.select(&clientes),
            store.select(&freelancers),
            store.select(&proyectos),
            store.select(&habilidades),
            store.select(&aplicaciones),
            store.select(&relaciones),
        );

        debug!("tables fetched in {}us", start.elapsed().as_micros());

        let datos = TablesData {
            clientes: results.0?,
            freelancers: results.1?,
            proyectos: results.2?,
            habilidades: results.3?,
            aplicaciones: results.4?,
            freelancer_habilidad: results.5?,
        };

        Ok(datos.into())
    }

    /// Static description of the database structure.
    pub fn schema(&self) -> &'static SchemaDescription {
        schema_description()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        query::{Insert, Update},
        repo::{self, ErrorKind, testing::MemoryStore},
    };
    use serde_json::{Value, json};
    use tokio::sync::Barrier;

    /// Store whose selects only complete once six of them are waiting at the same time.
    struct BarrierStore {
        barrier: Barrier,
    }

    impl RelationalStore for BarrierStore {
        async fn select(&self, _select: &Select) -> Result<Vec<Row>, repo::Error> {
            self.barrier.wait().await;
            Ok(Vec::new())
        }

        async fn insert(&self, _insert: &Insert) -> Result<Vec<Row>, repo::Error> {
            Ok(Vec::new())
        }

        async fn update(&self, _update: &Update) -> Result<Vec<Row>, repo::Error> {
            Ok(Vec::new())
        }
    }

    fn body(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn empty_dump() {
        let facade = FacadeMarketplace::new(Arc::new(MemoryStore::new()));
        let dump = facade.dump().await.unwrap();

        assert_eq!(
            serde_json::to_value(&dump).unwrap(),
            json!({
                "mensaje": DUMP_MESSAGE,
                "estadisticas": {
                    "total_clientes": 0,
                    "total_freelancers": 0,
                    "total_proyectos": 0,
                    "total_habilidades": 0,
                    "total_aplicaciones": 0,
                    "total_relaciones_habilidades": 0
                },
                "datos": {
                    "clientes": [],
                    "freelancers": [],
                    "proyectos": [],
                    "habilidades": [],
                    "aplicaciones": [],
                    "freelancer_habilidad": []
                }
            })
        );
    }

    #[tokio::test]
    async fn counts_match_rows() {
        let facade = FacadeMarketplace::new(Arc::new(MemoryStore::new()));
        facade
            .create_cliente(&body(json!({"nombre": "Ana", "correo": "a@x.com", "contrasena": "pw"})))
            .await
            .unwrap();
        for titulo in ["Web", "App"] {
            facade
                .create_proyecto(&body(json!({"titulo": titulo, "id_cliente": 1})))
                .await
                .unwrap();
        }

        let dump = facade.dump().await.unwrap();

        assert_eq!(dump.estadisticas.total_clientes, dump.datos.clientes.len());
        assert_eq!(dump.estadisticas.total_proyectos, 2);
        assert_eq!(dump.datos.proyectos.len(), 2);
        assert_eq!(
            dump.datos.proyectos[0]["clientes"],
            json!({"nombre": "Ana", "correo": "a@x.com"})
        );
    }

    #[tokio::test]
    async fn first_failure_in_table_order_wins() {
        let store = Arc::new(MemoryStore::new());
        store.fail_table(Table::Aplicaciones, "aplicaciones unreachable");
        store.fail_table(Table::Proyectos, "proyectos unreachable");

        let facade = FacadeMarketplace::new(store);
        let err = facade.dump().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConnectivityFailure);
        assert_eq!(err.to_string(), "proyectos unreachable");
    }

    #[tokio::test]
    async fn tables_are_fetched_concurrently() {
        let store = Arc::new(BarrierStore {
            barrier: Barrier::new(6),
        });
        let facade = FacadeMarketplace::new(store);

        let dump = tokio::time::timeout(Duration::from_secs(5), facade.dump())
            .await
            .expect("table reads did not overlap")
            .unwrap();

        assert_eq!(
            dump.estadisticas,
            TablesStats {
                total_clientes: 0,
                total_freelancers: 0,
                total_proyectos: 0,
                total_habilidades: 0,
                total_aplicaciones: 0,
                total_relaciones_habilidades: 0,
            }
        );
    }
}
