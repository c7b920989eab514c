//! Simple inspector for graph JSON element files.
//!
//! Reads a JSON array of vertex/edge documents and prints a summary.

use std::collections::BTreeMap;
use std::fs;

use graph_json::{from_text, ElementDoc, PropertyValue};

fn format_value(v: Option<&PropertyValue>) -> String {
    match v {
        None => "null".to_string(),
        Some(PropertyValue::Text(s)) => {
            let preview: String = s.chars().take(60).collect();
            if s.chars().count() > 60 {
                format!("\"{}...\"", preview)
            } else {
                format!("\"{}\"", preview)
            }
        }
        Some(PropertyValue::Float64(f)) if f.fract() == 0.0 => format!("{}", f),
        Some(PropertyValue::Float64(f)) => format!("{:.6}", f),
        Some(PropertyValue::Bool(b)) => format!("{}", b),
        Some(PropertyValue::List(items)) => format!("LIST[{}]", items.len()),
        Some(PropertyValue::Nested(_)) => "OBJECT".to_string(),
        Some(other) => format!("{:?}", other),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "elements.json".to_string());

    println!("Reading: {}", path);
    let text = fs::read_to_string(&path)?;
    println!("File size: {} bytes", text.len());

    let docs: Vec<ElementDoc> = from_text(&text)?;

    let mut labels: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    let mut property_keys: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &docs {
        *labels.entry((doc.kind.as_str(), doc.label.as_str())).or_default() += 1;
        for key in doc.properties.keys() {
            *property_keys.entry(key.as_str()).or_default() += 1;
        }
    }

    println!("\n=== Elements ({}) ===", docs.len());
    for ((kind, label), count) in &labels {
        println!("  {:<6} {:<24} {}", kind, label, count);
    }

    println!("\n=== Property keys ({}) ===", property_keys.len());
    for (key, count) in &property_keys {
        println!("  {:<24} {}", key, count);
    }

    println!("\n=== First elements ===");
    for doc in docs.iter().take(10) {
        match &doc.endpoints {
            Some(ends) => println!(
                "edge {} [{}] {}:{} -> {}:{}",
                doc.id, doc.label, ends.out_v_label, ends.out_v, ends.in_v_label, ends.in_v
            ),
            None => println!("vertex {} [{}]", doc.id, doc.label),
        }
        for key in doc.properties.keys() {
            println!("    {} = {}", key, format_value(doc.property(key).as_ref()));
        }
    }

    Ok(())
}
