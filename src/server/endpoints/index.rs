use axum::Json;
use serde_json::{Map, Value};

const INDEX_MESSAGE: &str = "API de Freelancer conectada a la base de datos";

const ROUTES: &[(&str, &str)] = &[
    ("/tablas", "Ver TODA la información de todas las tablas"),
    ("/schema", "Ver estructura de la base de datos"),
    ("/clientes", "Listar clientes"),
    ("/freelancers", "Listar freelancers"),
    ("/proyectos", "Listar proyectos"),
    ("/habilidades", "Listar habilidades"),
    ("/aplicaciones", "Listar aplicaciones"),
    ("/freelancer-habilidades", "Listar relación freelancer-habilidades"),
];

/// Route index
pub async fn index() -> Json<Value> {
    let rutas: Map<String, Value> = ROUTES
        .iter()
        .map(|(path, desc)| ((*path).to_owned(), Value::String((*desc).to_owned())))
        .collect();

    let mut body = Map::new();
    body.insert("mensaje".to_owned(), Value::String(INDEX_MESSAGE.to_owned()));
    body.insert("rutas".to_owned(), Value::Object(rutas));

    Json(Value::Object(body))
}
