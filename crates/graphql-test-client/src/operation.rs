use serde_json::Value;

/// A single GraphQL operation: the query document plus optional variables
/// and operation name. Serializes to the standard request body shape.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Operation {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl Operation {
    pub fn new(query: impl Into<String>) -> Operation {
        Operation {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    /// Attaches variables, replacing any previous ones.
    #[must_use]
    pub fn variables(mut self, variables: impl serde::Serialize) -> Operation {
        self.variables = Some(serde_json::to_value(variables).expect("variables to be serializable"));
        self
    }

    /// Names the operation to execute when the document contains several.
    #[must_use]
    pub fn operation_name(mut self, name: impl Into<String>) -> Operation {
        self.operation_name = Some(name.into());
        self
    }
}

impl From<&str> for Operation {
    fn from(query: &str) -> Self {
        Operation::new(query)
    }
}

impl From<String> for Operation {
    fn from(query: String) -> Self {
        Operation::new(query)
    }
}
