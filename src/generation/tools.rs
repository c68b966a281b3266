//! Built-in function declarations offered in `functionCall` mode.
//! Calls are reported back to the caller, not executed.

use super::models::FunctionDeclaration;
use serde_json::json;

pub fn builtin_tools() -> Vec<FunctionDeclaration> {
    vec![
        FunctionDeclaration {
            name: "lookup_celestial_object".to_string(),
            description: "Look up catalogue facts (type, distance, magnitude) for a named star, planet, galaxy or nebula.".to_string(),
            parameters: json!({
                "type": "OBJECT",
                "properties": {
                    "name": {"type": "STRING", "description": "Common or catalogue name, e.g. \"Betelgeuse\" or \"M31\""}
                },
                "required": ["name"]
            }),
        },
        FunctionDeclaration {
            name: "convert_distance".to_string(),
            description: "Convert an astronomical distance between units.".to_string(),
            parameters: json!({
                "type": "OBJECT",
                "properties": {
                    "value": {"type": "NUMBER"},
                    "from_unit": {"type": "STRING", "enum": ["km", "au", "light_year", "parsec"]},
                    "to_unit": {"type": "STRING", "enum": ["km", "au", "light_year", "parsec"]}
                },
                "required": ["value", "from_unit", "to_unit"]
            }),
        },
    ]
}
