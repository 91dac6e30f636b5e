//! Text extraction from type-dependent resource content.
//!
//! Each resource type has one extraction function registered in an
//! [`ExtractorRegistry`]. Extraction never fails: missing fields, `null`
//! content, and unknown types all produce an empty list. Callers that need to
//! report that as an error use [`ExtractorRegistry::try_extract`].

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AnalysisError;
use crate::model::{Resource, ResourceType, TextUnit, UnitKind};

/// Extraction function for one resource type.
pub type ExtractFn = fn(&Value) -> Vec<TextUnit>;

/// Lookup table from resource type to its extraction function.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<ResourceType, ExtractFn>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ResourceType::Comprension, extract_comprension);
        registry.register(ResourceType::Escritura, extract_escritura);
        registry.register(ResourceType::Gramatica, extract_gramatica);
        registry.register(ResourceType::Oral, extract_oral);
        registry.register(ResourceType::DragAndDrop, extract_drag_and_drop);
        registry.register(ResourceType::IceBreakers, extract_ice_breakers);
        registry
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.extractors.keys().map(|t| t.as_str()).collect();
        types.sort_unstable();
        f.debug_struct("ExtractorRegistry")
            .field("types", &types)
            .finish()
    }
}

impl ExtractorRegistry {
    /// A registry with no extractors.
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Register (or replace) the extractor for a resource type.
    pub fn register(&mut self, resource_type: ResourceType, extractor: ExtractFn) {
        self.extractors.insert(resource_type, extractor);
    }

    pub fn supports(&self, resource_type: &ResourceType) -> bool {
        self.extractors.contains_key(resource_type)
    }

    /// Extract the readable text units of a resource. Pure; never fails.
    pub fn extract(&self, resource: &Resource) -> Vec<TextUnit> {
        match (&resource.content, self.extractors.get(&resource.resource_type)) {
            (Some(content), Some(extractor)) if !content.is_null() => extractor(content),
            _ => Vec::new(),
        }
    }

    /// Like [`extract`](Self::extract), but an empty result becomes a
    /// `ContentProcessing` error carrying the reason.
    pub fn try_extract(&self, resource: &Resource) -> Result<Vec<TextUnit>, AnalysisError> {
        let content = match &resource.content {
            Some(content) if !content.is_null() => content,
            _ => return Err(AnalysisError::content(&resource.id, "content is null")),
        };
        let Some(extractor) = self.extractors.get(&resource.resource_type) else {
            return Err(AnalysisError::content(
                &resource.id,
                format!("no extractor for resource type '{}'", resource.resource_type),
            ));
        };
        let units = extractor(content);
        if units.is_empty() {
            return Err(AnalysisError::content(
                &resource.id,
                format!(
                    "no readable text found in '{}' content",
                    resource.resource_type
                ),
            ));
        }
        Ok(units)
    }
}

/// Extract with the default registry.
pub fn extract(resource: &Resource) -> Vec<TextUnit> {
    ExtractorRegistry::default().extract(resource)
}

// ---------------------------------------------------------------------------
// Content shapes
// ---------------------------------------------------------------------------

/// Deserialize leniently: a shape mismatch yields `None`.
fn parse<T: DeserializeOwned>(value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!("content does not match expected shape: {e}");
            None
        }
    }
}

fn push(units: &mut Vec<TextUnit>, kind: UnitKind, text: Option<&str>) {
    if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
        units.push(TextUnit::new(kind, text));
    }
}

/// Entries that may be a bare string or an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entry<T> {
    Text(String),
    Full(T),
}

#[derive(Debug, Deserialize)]
struct ComprensionContent {
    #[serde(default, alias = "texto", alias = "lectura", alias = "passage")]
    text: Option<String>,
    #[serde(default, alias = "preguntas")]
    questions: Vec<Entry<QuestionContent>>,
}

#[derive(Debug, Deserialize)]
struct QuestionContent {
    #[serde(default, alias = "pregunta", alias = "enunciado")]
    question: Option<String>,
    #[serde(default, alias = "opciones")]
    options: Vec<String>,
    #[serde(default, alias = "respuesta", alias = "correct_answer")]
    answer: Option<String>,
}

fn extract_comprension(value: &Value) -> Vec<TextUnit> {
    let Some(content) = parse::<ComprensionContent>(value) else {
        return Vec::new();
    };
    let mut units = Vec::new();
    push(&mut units, UnitKind::Passage, content.text.as_deref());
    for question in &content.questions {
        match question {
            Entry::Text(text) => push(&mut units, UnitKind::Question, Some(text.as_str())),
            Entry::Full(q) => {
                push(&mut units, UnitKind::Question, q.question.as_deref());
                for option in &q.options {
                    push(&mut units, UnitKind::Option, Some(option.as_str()));
                }
                push(&mut units, UnitKind::Answer, q.answer.as_deref());
            }
        }
    }
    units
}

#[derive(Debug, Deserialize)]
struct EscrituraContent {
    #[serde(default, alias = "consigna", alias = "tema")]
    prompt: Option<String>,
    #[serde(default, alias = "instrucciones")]
    instructions: Option<String>,
    #[serde(default, alias = "ejemplo")]
    example: Option<String>,
}

fn extract_escritura(value: &Value) -> Vec<TextUnit> {
    let Some(content) = parse::<EscrituraContent>(value) else {
        return Vec::new();
    };
    let mut units = Vec::new();
    push(&mut units, UnitKind::Prompt, content.prompt.as_deref());
    push(&mut units, UnitKind::Instructions, content.instructions.as_deref());
    push(&mut units, UnitKind::Example, content.example.as_deref());
    units
}

#[derive(Debug, Deserialize)]
struct GramaticaContent {
    #[serde(default, alias = "instrucciones")]
    instructions: Option<String>,
    #[serde(default, alias = "ejercicios")]
    items: Vec<Entry<GrammarItemContent>>,
}

#[derive(Debug, Deserialize)]
struct GrammarItemContent {
    #[serde(default, alias = "enunciado", alias = "oracion", alias = "sentence")]
    statement: Option<String>,
    #[serde(default, alias = "respuesta")]
    answer: Option<String>,
}

fn extract_gramatica(value: &Value) -> Vec<TextUnit> {
    let Some(content) = parse::<GramaticaContent>(value) else {
        return Vec::new();
    };
    let mut units = Vec::new();
    push(&mut units, UnitKind::Instructions, content.instructions.as_deref());
    for item in &content.items {
        match item {
            Entry::Text(text) => push(&mut units, UnitKind::GrammarItem, Some(text.as_str())),
            Entry::Full(item) => {
                push(&mut units, UnitKind::GrammarItem, item.statement.as_deref());
                push(&mut units, UnitKind::Answer, item.answer.as_deref());
            }
        }
    }
    units
}

#[derive(Debug, Deserialize)]
struct OralContent {
    #[serde(default, alias = "guion")]
    script: Option<String>,
    #[serde(default, alias = "dialogo", alias = "diálogo")]
    dialogue: Vec<Entry<DialogueLineContent>>,
}

#[derive(Debug, Deserialize)]
struct DialogueLineContent {
    #[serde(default, alias = "texto", alias = "text")]
    line: Option<String>,
}

fn extract_oral(value: &Value) -> Vec<TextUnit> {
    let Some(content) = parse::<OralContent>(value) else {
        return Vec::new();
    };
    let mut units = Vec::new();
    push(&mut units, UnitKind::Script, content.script.as_deref());
    for line in &content.dialogue {
        match line {
            Entry::Text(text) => push(&mut units, UnitKind::DialogueLine, Some(text.as_str())),
            Entry::Full(l) => push(&mut units, UnitKind::DialogueLine, l.line.as_deref()),
        }
    }
    units
}

#[derive(Debug, Deserialize)]
struct DragAndDropContent {
    #[serde(default, alias = "instrucciones")]
    instructions: Option<String>,
    #[serde(default, alias = "elementos")]
    items: Vec<Entry<DragItemContent>>,
}

#[derive(Debug, Deserialize)]
struct DragItemContent {
    #[serde(default, alias = "texto")]
    text: Option<String>,
}

fn extract_drag_and_drop(value: &Value) -> Vec<TextUnit> {
    let Some(content) = parse::<DragAndDropContent>(value) else {
        return Vec::new();
    };
    let mut units = Vec::new();
    push(&mut units, UnitKind::Instructions, content.instructions.as_deref());
    for item in &content.items {
        match item {
            Entry::Text(text) => push(&mut units, UnitKind::Item, Some(text.as_str())),
            Entry::Full(i) => push(&mut units, UnitKind::Item, i.text.as_deref()),
        }
    }
    units
}

#[derive(Debug, Deserialize)]
struct IceBreakersContent {
    #[serde(default, alias = "actividades")]
    activities: Vec<Entry<ActivityContent>>,
    #[serde(default, alias = "preguntas")]
    questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ActivityContent {
    #[serde(default, alias = "titulo", alias = "título")]
    title: Option<String>,
    #[serde(default, alias = "descripcion", alias = "descripción")]
    description: Option<String>,
}

fn extract_ice_breakers(value: &Value) -> Vec<TextUnit> {
    let Some(content) = parse::<IceBreakersContent>(value) else {
        return Vec::new();
    };
    let mut units = Vec::new();
    for activity in &content.activities {
        match activity {
            Entry::Text(text) => push(&mut units, UnitKind::Activity, Some(text.as_str())),
            Entry::Full(a) => {
                push(&mut units, UnitKind::Activity, a.title.as_deref());
                push(&mut units, UnitKind::Activity, a.description.as_deref());
            }
        }
    }
    for question in &content.questions {
        push(&mut units, UnitKind::Question, Some(question.as_str()));
    }
    units
}
