use axum::response::{Html, Json};
use serde_json::{json, Map, Value};

use crate::model::{GrinderType, RoastLevel};

const OPENAPI_PATH: &str = "/doc";

// API Documentation handlers
pub async fn get_api_docs() -> Html<String> {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Brew Journal API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body {
            margin: 0;
            background: #fafafa;
        }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: '__OPENAPI_PATH__',
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#;
    Html(html.replace("__OPENAPI_PATH__", OPENAPI_PATH))
}

pub async fn get_openapi_spec() -> Json<Value> {
    Json(openapi_document())
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn message_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(schema_ref("Message"))
    })
}

fn id_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(schema_ref("IdResponse"))
    })
}

/// The four CRUD operations of one collection
fn collection_paths(collection: &str, tag: &str, singular: &str) -> (Value, Value) {
    let record = tag.trim_end_matches('s');
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": format!("{} ID", record),
        "schema": { "type": "string", "pattern": "^\\d+$" }
    });

    let list_and_create = json!({
        "get": {
            "tags": [tag],
            "summary": format!("List {}", collection),
            "responses": {
                "200": {
                    "description": format!("All {}", collection),
                    "content": json_content(json!({ "type": "array", "items": schema_ref(record) }))
                },
                "500": message_response("Store failure")
            }
        },
        "post": {
            "tags": [tag],
            "summary": format!("Create a {}", singular),
            "requestBody": {
                "required": true,
                "content": json_content(schema_ref(&format!("New{}", record)))
            },
            "responses": {
                "201": id_response(&format!("Created {} ID", singular)),
                "400": message_response("Invalid request body"),
                "500": message_response(&format!("Failed to create {}", singular))
            }
        }
    });

    let by_id = json!({
        "patch": {
            "tags": [tag],
            "summary": format!("Update a {}", singular),
            "description": "Only the fields present in the body are overwritten",
            "parameters": [id_param.clone()],
            "requestBody": {
                "required": true,
                "content": json_content(schema_ref(&format!("{}Patch", record)))
            },
            "responses": {
                "200": id_response(&format!("Updated {} ID", singular)),
                "400": message_response("Invalid id or request body"),
                "404": message_response(&format!("{} not found", record)),
                "500": message_response("Store failure")
            }
        },
        "delete": {
            "tags": [tag],
            "summary": format!("Delete a {}", singular),
            "parameters": [id_param],
            "responses": {
                "200": id_response(&format!("Deleted {} ID", singular)),
                "400": message_response("Invalid id"),
                "404": message_response(&format!("{} not found", record)),
                "500": message_response("Store failure")
            }
        }
    });

    (list_and_create, by_id)
}

fn component_schemas() -> Value {
    let roast_levels: Vec<&str> = RoastLevel::ALL.iter().map(|l| l.as_str()).collect();
    let grinder_types: Vec<&str> = GrinderType::ALL.iter().map(|g| g.as_str()).collect();
    let roast_level = json!({ "type": "string", "enum": roast_levels });
    let grinder_type = json!({ "type": "string", "enum": grinder_types });

    let bean_fields = json!({
        "name": { "type": "string", "minLength": 1, "description": "Bean name" },
        "origin": { "type": "string", "description": "Country or region of origin" },
        "variety": { "type": "string", "description": "Cultivar" },
        "roastLevel": roast_level
    });
    let recipe_fields = json!({
        "name": { "type": "string" },
        "description": { "type": "string" },
        "instructions": { "type": "string" },
        "waterAmount": { "type": "integer", "description": "Water (ml)" },
        "beanAmount": { "type": "integer", "description": "Beans (g)" },
        "brewTime": { "type": "integer", "description": "Brew time (seconds)" },
        "temperature": { "type": "integer", "description": "Water temperature (°C)" },
        "grinderType": grinder_type,
        "grinderName": { "type": "string", "nullable": true },
        "grinderClicks": { "type": "integer", "nullable": true, "description": "Grind setting in clicks" }
    });
    let note_fields = json!({
        "name": { "type": "string" },
        "recipe": { "type": "integer", "description": "Recipe ID" },
        "bean": { "type": "integer", "description": "Bean ID" },
        "content": { "type": "string" }
    });

    let mut schemas = Map::new();
    schemas.insert(
        "Message".to_string(),
        json!({
            "type": "object",
            "required": ["message"],
            "properties": { "message": { "type": "string" } }
        }),
    );
    schemas.insert(
        "IdResponse".to_string(),
        json!({
            "type": "object",
            "required": ["id"],
            "properties": { "id": { "type": "integer" } }
        }),
    );

    let no_optional: &[&str] = &[];
    let recipe_optional: &[&str] = &["grinderName", "grinderClicks"];
    for (record, fields, optional) in [
        ("Bean", bean_fields, no_optional),
        ("Recipe", recipe_fields, recipe_optional),
        ("Note", note_fields, no_optional),
    ] {
        let properties = fields.as_object().cloned().unwrap_or_default();
        let required: Vec<&String> = properties
            .keys()
            .filter(|key| !optional.contains(&key.as_str()))
            .collect();

        let mut full_properties = properties.clone();
        full_properties.insert("id".to_string(), json!({ "type": "integer" }));
        let mut full_required: Vec<Value> = vec![json!("id")];
        full_required.extend(properties.keys().map(|key| json!(key)));

        schemas.insert(
            record.to_string(),
            json!({ "type": "object", "required": full_required, "properties": full_properties }),
        );
        schemas.insert(
            format!("New{}", record),
            json!({ "type": "object", "required": required, "properties": properties }),
        );
        // Patches reject `null` on every field
        let mut patch_properties = properties.clone();
        for property in patch_properties.values_mut() {
            if let Some(property) = property.as_object_mut() {
                property.remove("nullable");
            }
        }
        schemas.insert(
            format!("{}Patch", record),
            json!({ "type": "object", "properties": patch_properties }),
        );
    }

    Value::Object(schemas)
}

pub fn openapi_document() -> Value {
    let mut paths = Map::new();
    for (collection, tag, singular) in [
        ("beans", "Beans", "bean"),
        ("recipes", "Recipes", "recipe"),
        ("notes", "Notes", "note"),
    ] {
        let (list_and_create, by_id) = collection_paths(collection, tag, singular);
        paths.insert(format!("/{}", collection), list_and_create);
        paths.insert(format!("/{}/{{id}}", collection), by_id);
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Coffee brewing journal: beans, recipes and tasting notes"
        },
        "tags": [
            { "name": "Beans", "description": "Coffee beans" },
            { "name": "Recipes", "description": "Brewing recipes" },
            { "name": "Notes", "description": "Tasting notes linking a recipe and a bean" }
        ],
        "paths": paths,
        "components": { "schemas": component_schemas() }
    })
}
