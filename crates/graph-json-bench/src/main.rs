//! Benchmark for graph JSON encoding using a person/knows social graph.
//!
//! Usage: `bench-social [people.json] [count]`. Without an input file a
//! synthetic graph of `count` people (default 10,000) is generated.

use std::error::Error;
use std::fs;
use std::time::Instant;

use graph_json::{
    Edge, ElementDoc, Endpoint, NumberKind, PropertyValue, Registry, Timestamp, TimestampFormat,
    Vertex, VertexBuilder, default_registry, from_text,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_PEOPLE: usize = 10_000;
const DECODE_ITERS: u32 = 10;

/// 2021-01-01T00:00:00Z
const EPOCH_2021: i64 = 1_609_459_200_000;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct Person {
    name: String,
    age: Option<i32>,
    city: Option<String>,
    score: Option<f64>,
    /// Names of people this person knows.
    #[serde(default)]
    knows: Vec<String>,
}

fn synthetic_people(count: usize) -> Vec<Person> {
    (0..count)
        .map(|i| Person {
            name: format!("person-{i}"),
            age: Some(18 + (i % 60) as i32),
            city: (i % 3 != 0).then(|| format!("city-{}", i % 97)),
            score: Some((i % 1000) as f64 / 8.0),
            knows: [1, 7, 31]
                .iter()
                .map(|step| (i + step) % count)
                .filter(|&j| j != i)
                .map(|j| format!("person-{j}"))
                .collect(),
        })
        .collect()
}

// =============================================================================
// CONVERSION TO ELEMENTS
// =============================================================================

struct Graph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

fn build_graph(people: &[Person]) -> Graph {
    let vertices: Vec<Vertex> = people
        .iter()
        .map(|p| {
            VertexBuilder::new(Uuid::new_v4().to_string(), "person")
                .properties(|mut props| {
                    props = props.text("name", p.name.as_str());
                    if let Some(age) = p.age {
                        props = props.int32("age", age);
                    }
                    props = match &p.city {
                        Some(city) => props.text("city", city.as_str()),
                        None => props.null("city"),
                    };
                    if let Some(score) = p.score {
                        props = props.float64("score", score);
                    }
                    props
                })
                .build()
        })
        .collect();

    let by_name: std::collections::HashMap<&str, &Vertex> = people
        .iter()
        .zip(&vertices)
        .map(|(p, v)| (p.name.as_str(), v))
        .collect();

    let mut edges = Vec::new();
    for (person, vertex) in people.iter().zip(&vertices) {
        for friend in &person.knows {
            let Some(other) = by_name.get(friend.as_str()) else {
                tracing::warn!(person = %person.name, friend = %friend, "unknown friend, skipping edge");
                continue;
            };
            let id = edges.len() as i64;
            let since = Timestamp::from_millis(EPOCH_2021 + id * 86_400_000);
            edges.push(
                Edge::new(id, "knows", Endpoint::of(vertex), Endpoint::of(other))
                    .with_property("since", since)
                    .with_property("weight", PropertyValue::Float32(0.5)),
            );
        }
    }

    Graph { vertices, edges }
}

/// Encodes every element and joins them into one JSON array.
fn encode_graph(graph: &Graph, registry: &Registry) -> Result<String, graph_json::EncodeError> {
    let mut out = String::from("[");
    let texts = graph
        .vertices
        .iter()
        .map(|v| registry.to_text(v))
        .chain(graph.edges.iter().map(|e| registry.to_text(e)));
    for (i, text) in texts.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&text?);
    }
    out.push(']');
    Ok(out)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

fn throughput(bytes: usize, secs: f64) -> f64 {
    (bytes as f64 / 1_000_000.0) / secs
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let input = args.next().filter(|a| a != "-");
    let count = match args.next() {
        Some(n) => n.parse::<usize>()?,
        None => DEFAULT_PEOPLE,
    };

    let parse_start = Instant::now();
    let people = match &input {
        Some(path) => {
            println!("Loading people from: {}", path);
            let json_data = fs::read_to_string(path)?;
            serde_json::from_str::<Vec<Person>>(&json_data)?
        }
        None => synthetic_people(count),
    };
    println!("Loaded {} people in {:?}", people.len(), parse_start.elapsed());

    let convert_start = Instant::now();
    let graph = build_graph(&people);
    println!(
        "Built {} vertices and {} edges in {:?}",
        graph.vertices.len(),
        graph.edges.len(),
        convert_start.elapsed()
    );

    // Encode (default registry)
    let encode_start = Instant::now();
    let encoded = encode_graph(&graph, default_registry())?;
    let encode_time = encode_start.elapsed();
    println!("\nEncode (epoch millis): {} bytes in {:?}", encoded.len(), encode_time);
    println!("  Throughput: {:.2} MB/s", throughput(encoded.len(), encode_time.as_secs_f64()));

    // Encoding must be byte-stable
    if encode_graph(&graph, default_registry())? != encoded {
        return Err("encoding is not deterministic".into());
    }

    // Encode (RFC 3339 timestamps)
    let rfc3339 = Registry::builder().timestamps(TimestampFormat::Rfc3339).build();
    let rfc_start = Instant::now();
    let encoded_rfc = encode_graph(&graph, &rfc3339)?;
    let rfc_time = rfc_start.elapsed();
    println!("\nEncode (RFC 3339): {} bytes in {:?}", encoded_rfc.len(), rfc_time);
    println!("  Throughput: {:.2} MB/s", throughput(encoded_rfc.len(), rfc_time.as_secs_f64()));

    // Decode
    for _ in 0..3 {
        from_text::<Vec<ElementDoc>>(&encoded)?;
    }
    let decode_start = Instant::now();
    let mut decoded = Vec::new();
    for _ in 0..DECODE_ITERS {
        decoded = from_text::<Vec<ElementDoc>>(&encoded)?;
    }
    let decode_time = decode_start.elapsed() / DECODE_ITERS;
    println!("\nDecode: {:?} (avg of {} iterations)", decode_time, DECODE_ITERS);
    println!("  Throughput: {:.2} MB/s", throughput(encoded.len(), decode_time.as_secs_f64()));

    let element_count = graph.vertices.len() + graph.edges.len();
    if decoded.len() != element_count {
        return Err(format!("decoded {} elements, expected {}", decoded.len(), element_count).into());
    }

    // Narrow the widened ages back and compare
    let mut ages_checked = 0usize;
    for (doc, person) in decoded.iter().zip(&people) {
        let age = doc.property_as("age", NumberKind::Int32);
        if age != person.age.map(PropertyValue::Int32) {
            return Err(format!("age mismatch for {}: {:?}", person.name, age).into());
        }
        ages_checked += 1;
    }
    let edges_with_since = decoded
        .iter()
        .filter(|d| d.is_edge())
        .filter_map(|d| d.timestamp("since").ok().flatten())
        .count();
    tracing::info!(ages_checked, edges_with_since, "decoded graph verified");

    println!("\n=== Summary ===");
    println!("People: {}", people.len());
    println!("Elements: {} ({} vertices, {} edges)", element_count, graph.vertices.len(), graph.edges.len());
    println!(
        "JSON size: {} bytes ({:.1} MB), RFC 3339 variant {:.1}% of that",
        encoded.len(),
        encoded.len() as f64 / 1_000_000.0,
        100.0 * encoded_rfc.len() as f64 / encoded.len() as f64
    );

    Ok(())
}
