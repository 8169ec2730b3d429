//! Descripción serializable del grafo de dependencias de un pipeline.
//!
//! No dibuja nada: entrega nodos y aristas `(productor?, variable,
//! consumidor?)` para que un renderer externo los consuma. Una arista sin
//! `start` viene de un input del pipeline; una sin `end` va a un output.

use indexmap::IndexMap;
use serde::Serialize;

use super::Pipeline;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub start: Option<String>,
    pub label: String,
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphInput {
    pub name: String,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineGraph {
    pub name: String,
    pub definition_hash: String,
    pub inputs: Vec<GraphInput>,
    pub outputs: Vec<String>,
    pub functions: Vec<String>,
    /// Nodos de fan-out: un productor que entrega la misma variable a
    /// varios consumidores pasa por un único nodo `"{productor}_{variable}"`.
    pub dummy_nodes: Vec<String>,
    pub edges: Vec<Edge>,
}

impl Pipeline {
    pub fn graph(&self) -> PipelineGraph {
        let step_name = |i: usize| self.steps[i].name().to_string();
        let mut edges = vec![];
        for (step, sources) in self.steps.iter().zip(&self.resolution.input_sources) {
            for (var, source) in step.input_names().iter().zip(sources) {
                edges.push(Edge { start: source.map(step_name),
                                  label: var.clone(),
                                  end: Some(step.name().to_string()) });
            }
        }

        // fusionar usos múltiples de un mismo output
        let mut groups: IndexMap<(String, String), Vec<usize>> = IndexMap::new();
        for (i, e) in edges.iter().enumerate() {
            if let (Some(start), Some(_)) = (&e.start, &e.end) {
                groups.entry((start.clone(), e.label.clone())).or_default().push(i);
            }
        }
        let mut dummy_nodes = vec![];
        let mut fused = vec![false; edges.len()];
        let mut extra = vec![];
        for ((start, label), members) in groups.into_iter().filter(|(_, m)| m.len() > 1) {
            let node = format!("{start}_{label}");
            extra.push(Edge { start: Some(start),
                              label: label.clone(),
                              end: Some(node.clone()) });
            for i in members {
                fused[i] = true;
                extra.push(Edge { start: Some(node.clone()),
                                  label: label.clone(),
                                  end: edges[i].end.clone() });
            }
            dummy_nodes.push(node);
        }
        let mut edges: Vec<Edge> = edges.into_iter().zip(fused).filter(|(_, f)| !f).map(|(e, _)| e).collect();
        edges.extend(extra);

        for var in self.output_names() {
            edges.push(Edge { start: self.resolution.last_producer.get(var).copied().map(step_name),
                              label: var.clone(),
                              end: None });
        }

        PipelineGraph { name: self.name.clone(),
                        definition_hash: self.definition_hash(),
                        inputs: self.input_names()
                                    .iter()
                                    .map(|n| GraphInput { name: n.clone(),
                                                          default: self.default_values.get(n).cloned() })
                                    .collect(),
                        outputs: self.output_names().to_vec(),
                        functions: self.steps.iter().map(|s| s.name().to_string()).collect(),
                        dummy_nodes,
                        edges }
    }
}
