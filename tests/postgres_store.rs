//! Repository tests against a live PostgreSQL instance (`DATABASE_URL`).
//!
//! Each test runs on a fresh database created by `sqlx::test`, with the
//! `migrations/` schema applied.
#![cfg(feature = "postgres-tests")]

use std::sync::Arc;

use serde_json::{Value, json};

use freelanced::{
    query::{Insert, Select, embed},
    repo::{self, ErrorKind, FacadeMarketplace, NOT_SINGLE_ROW, RelationalStore, Repository},
    types::{Row, Table},
};

fn body(value: Value) -> Row {
    value.as_object().unwrap().clone()
}

async fn seed(facade: &FacadeMarketplace<Repository>) {
    facade
        .create_cliente(&body(
            json!({"nombre": "Ana", "correo": "ana@x.com", "telefono": "555", "contrasena": "pw"}),
        ))
        .await
        .unwrap();
    facade
        .create_freelancer(&body(
            json!({"nombre": "Luis", "correo": "luis@x.com", "contrasena": "pw", "biografia": "dev"}),
        ))
        .await
        .unwrap();
    facade
        .create_habilidad(&body(json!({"nombre": "Rust"})))
        .await
        .unwrap();
    facade
        .create_proyecto(&body(json!({"titulo": "Tienda", "id_cliente": 1})))
        .await
        .unwrap();
    facade
        .create_aplicacion(&body(
            json!({"id_freelancer": 1, "id_proyecto": 1, "mensaje_propuesta": "hola"}),
        ))
        .await
        .unwrap();
    facade
        .create_freelancer_habilidad(&body(
            json!({"id_freelancer": 1, "id_habilidad": 1, "anios_experiencia": 3, "nivel": "intermedio"}),
        ))
        .await
        .unwrap();
}

#[sqlx::test]
async fn insert_returns_row_with_defaults(pool: sqlx::Pool<repo::Database>) -> sqlx::Result<()> {
    let facade = FacadeMarketplace::new(Arc::new(Repository::new(pool)));

    let rows = facade
        .create_freelancer(&body(
            json!({"nombre": "Luis", "correo": "luis@x.com", "contrasena": "pw"}),
        ))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    let keys: Vec<&String> = row.keys().collect();
    assert_eq!(
        keys,
        vec![
            "id_freelancer",
            "nombre",
            "telefono",
            "correo",
            "contrasena",
            "biografia",
            "fecha_registro"
        ]
    );
    assert_eq!(row["id_freelancer"], 1);
    assert_eq!(row["telefono"], Value::Null);
    assert!(row["fecha_registro"].is_string());

    let fetched = facade.freelancer("1").await.unwrap();
    assert_eq!(fetched["correo"], "luis@x.com");
    assert_eq!(fetched["freelancer_habilidad"], json!([]));

    Ok(())
}

#[sqlx::test]
async fn constraint_violations(pool: sqlx::Pool<repo::Database>) -> sqlx::Result<()> {
    let facade = FacadeMarketplace::new(Arc::new(Repository::new(pool)));
    seed(&facade).await;

    let err = facade
        .create_cliente(&body(json!({"nombre": "Otra", "correo": "ana@x.com", "contrasena": "pw"})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert_eq!(
        err.to_string(),
        "duplicate key value violates unique constraint \"clientes_correo_key\""
    );

    let err = facade
        .create_aplicacion(&body(json!({"id_freelancer": 99, "id_proyecto": 1})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert!(err.to_string().contains("aplicaciones_id_freelancer_fkey"));

    let err = facade
        .update_aplicacion_estado("1", &body(json!({"estado": "archivado"})))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert!(err.to_string().contains("aplicaciones_estado_check"));

    let err = facade.cliente("uno").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

    Ok(())
}

#[sqlx::test]
async fn single_row_lookup(pool: sqlx::Pool<repo::Database>) -> sqlx::Result<()> {
    let store = Repository::new(pool);
    let facade = FacadeMarketplace::new(Arc::new(store.clone()));
    seed(&facade).await;

    let err = facade.proyecto("42").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), NOT_SINGLE_ROW);

    let proyecto = facade.proyecto("1").await.unwrap();
    assert_eq!(
        proyecto["clientes"],
        json!({"nombre": "Ana", "correo": "ana@x.com", "telefono": "555"})
    );
    assert_eq!(proyecto["aplicaciones"][0]["freelancers"]["nombre"], "Luis");

    // more than one row is not a single row either
    store
        .insert(&Insert::row(Table::Habilidades, body(json!({"nombre": "SQL"}))))
        .await
        .unwrap();
    let err = store
        .select_single(&Select::from(Table::Habilidades))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    Ok(())
}

#[sqlx::test]
async fn listing_embeds(pool: sqlx::Pool<repo::Database>) -> sqlx::Result<()> {
    let facade = FacadeMarketplace::new(Arc::new(Repository::new(pool)));
    seed(&facade).await;

    let aplicaciones = facade.aplicaciones().await.unwrap();
    assert_eq!(aplicaciones.total(), 1);
    let row = &aplicaciones.rows()[0];
    assert_eq!(
        row["freelancers"],
        json!({"nombre": "Luis", "correo": "luis@x.com"})
    );
    assert_eq!(
        row["proyectos"],
        json!({"titulo": "Tienda", "presupuesto": null, "clientes": {"nombre": "Ana"}})
    );

    let relaciones = facade.freelancer_habilidades().await.unwrap();
    assert_eq!(relaciones.key(), "relaciones");
    assert_eq!(relaciones.rows()[0]["habilidades"], json!({"nombre": "Rust"}));

    let select = Select::from(Table::Clientes)
        .columns(&["nombre"])
        .embed(embed(Table::Proyectos).columns(&["titulo"]));
    let facade_store = facade.store();
    let clientes = facade_store.select(&select).await.unwrap();
    assert_eq!(
        Value::Object(clientes[0].clone()),
        json!({"nombre": "Ana", "proyectos": [{"titulo": "Tienda"}]})
    );

    Ok(())
}

#[sqlx::test]
async fn patch_and_dump(pool: sqlx::Pool<repo::Database>) -> sqlx::Result<()> {
    let facade = FacadeMarketplace::new(Arc::new(Repository::new(pool)));
    seed(&facade).await;

    let rows = facade
        .update_aplicacion_estado("1", &body(json!({"estado": "aceptado", "id_proyecto": 7})))
        .await
        .unwrap();
    assert_eq!(rows[0]["estado"], "aceptado");
    assert_eq!(rows[0]["id_proyecto"], 1);

    let rows = facade
        .update_aplicacion_estado("5", &body(json!({"estado": "rechazado"})))
        .await
        .unwrap();
    assert!(rows.is_empty());

    let dump = facade.dump().await.unwrap();
    assert_eq!(dump.estadisticas.total_clientes, 1);
    assert_eq!(dump.estadisticas.total_relaciones_habilidades, 1);
    assert_eq!(
        dump.datos.freelancer_habilidad[0]["freelancers"],
        json!({"nombre": "Luis"})
    );
    assert_eq!(
        dump.datos.aplicaciones[0]["proyectos"],
        json!({"titulo": "Tienda"})
    );

    Ok(())
}
