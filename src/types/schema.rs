use std::sync::LazyLock;

use serde::Serialize;
use serde_json::{Map, Value};

use super::Table;

const SCHEMA_MESSAGE: &str = "Estructura de la base de datos";

/// Description of the database structure served by the schema endpoint.
///
/// Rendered once from the table catalog and shared for the whole process lifetime.
#[derive(Debug, Serialize)]
pub struct SchemaDescription {
    pub mensaje: &'static str,
    pub tablas: Map<String, Value>,
}

/// Order of the tables in the description
const SCHEMA_ORDER: [Table; 6] = [
    Table::Aplicaciones,
    Table::Clientes,
    Table::Freelancers,
    Table::Habilidades,
    Table::FreelancerHabilidad,
    Table::Proyectos,
];

static SCHEMA: LazyLock<SchemaDescription> = LazyLock::new(|| {
    let tablas = SCHEMA_ORDER
        .iter()
        .map(|table| {
            let columnas: Map<String, Value> = table
                .columns()
                .iter()
                .map(|c| (c.name.to_owned(), Value::String(c.describe())))
                .collect();

            let mut description = Map::new();
            description.insert(
                "descripcion".to_owned(),
                Value::String(table.def().description.to_owned()),
            );
            description.insert("columnas".to_owned(), Value::Object(columnas));

            (table.name().to_owned(), Value::Object(description))
        })
        .collect();

    SchemaDescription {
        mensaje: SCHEMA_MESSAGE,
        tablas,
    }
});

pub fn schema_description() -> &'static SchemaDescription {
    &SCHEMA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_every_table() {
        let schema = schema_description();
        assert_eq!(schema.tablas.len(), Table::ALL.len());
        for table in Table::ALL {
            assert!(schema.tablas.contains_key(table.name()));
        }

        let proyectos = &schema.tablas["proyectos"];
        assert_eq!(proyectos["descripcion"], "Proyectos publicados por clientes");
        assert_eq!(
            proyectos["columnas"]["id_cliente"],
            "integer (FK -> clientes)"
        );
        assert_eq!(
            proyectos["columnas"]["estado"],
            "varchar (activo, cerrado, en_progreso)"
        );

        // column order follows the catalog
        let columns: Vec<&String> = schema.tablas["clientes"]["columnas"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(
            columns,
            vec!["id_cliente", "nombre", "correo", "telefono", "contrasena"]
        );
    }

    #[test]
    fn tables_in_listing_order() {
        let tables: Vec<&String> = schema_description().tablas.keys().collect();
        assert_eq!(
            tables,
            vec![
                "aplicaciones",
                "clientes",
                "freelancers",
                "habilidades",
                "freelancer_habilidad",
                "proyectos"
            ]
        );
    }
}
