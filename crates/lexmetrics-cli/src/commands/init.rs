//! The `lexmetrics init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("lexmetrics.toml").exists() {
        println!("lexmetrics.toml already exists, skipping.");
    } else {
        std::fs::write("lexmetrics.toml", SAMPLE_CONFIG)?;
        println!("Created lexmetrics.toml");
    }

    std::fs::create_dir_all("resources")?;
    let example_path = Path::new("resources/example.json");
    if example_path.exists() {
        println!("resources/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_RESOURCES)?;
        println!("Created resources/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: lexmetrics validate --data resources");
    println!("  2. Run: lexmetrics batch");
    println!("  3. Run: lexmetrics analyze --id lectura-1");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lexmetrics configuration

[store]
type = "file"
path = "./resources"

[metrics.scoring]
grammar_weight = 0.6
lexical_weight = 0.4
excellent = 90.0
good = 75.0
regular = 60.0

[metrics.richness]
high = 0.8
medium = 0.6

[metrics.batch]
max_resources = 50
time_budget_ms = 1000
parallelism = 4
"#;

const EXAMPLE_RESOURCES: &str = r#"[
  {
    "id": "lectura-1",
    "type": "comprension",
    "ownerId": "docente-1",
    "title": "Un día en el parque",
    "content": {
      "texto": "El sábado por la mañana, Lucía fue al parque con su abuelo. Vieron patos en el lago y comieron helado de fresa.",
      "preguntas": [
        {
          "pregunta": "¿Con quién fue Lucía al parque?",
          "opciones": ["Con su abuelo", "Con su madre", "Sola"],
          "respuesta": "Con su abuelo"
        }
      ]
    }
  },
  {
    "id": "escritura-1",
    "type": "escritura",
    "ownerId": "docente-1",
    "content": {
      "consigna": "Describe tu comida favorita.",
      "instrucciones": "Escribe al menos cinco oraciones completas.",
      "ejemplo": "Mi comida favorita es la paella. La prepara mi padre los domingos."
    }
  },
  {
    "id": "gramatica-1",
    "type": "gramatica",
    "ownerId": "docente-2",
    "content": {
      "instrucciones": "Elige la forma correcta del verbo.",
      "ejercicios": [
        { "enunciado": "Nosotros (vivir) en Sevilla.", "respuesta": "vivimos" },
        { "enunciado": "Ella (tener) dos hermanos.", "respuesta": "tiene" }
      ]
    }
  }
]
"#;
