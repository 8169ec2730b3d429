//! Demo de labelflow: construye un pipeline, lo ejecuta, describe su grafo
//! y corre un estudio paramétrico sobre él.

use label_core::{let_values, namespace, timed, LabelledFunction, Output, Pipeline, PipelineOptions};
use label_maps::{full_parametric_study, Columns};
use labelflow_rust::config::AppConfig;
use labelflow_rust::AppError;
use log::info;
use serde_json::json;

fn demo_pipeline() -> Result<Pipeline, AppError> {
    let radius = LabelledFunction::builder("half").input("diameter")
                                                  .output("radius")
                                                  .build(|a| Ok(Output::single(a.f64("diameter")? / 2.0)))?;
    let volume = LabelledFunction::builder("cylinder_volume").inputs(["radius", "length"])
                                                             .optional("pi", std::f64::consts::PI)
                                                             .output("volume")
                                                             .build(|a| {
                                                                 let r = a.f64("radius")?;
                                                                 Ok(Output::single(a.f64("pi")? * r * r * a.f64("length")?))
                                                             })?;
    let pipe = Pipeline::with_options([radius, volume.hide(&["pi"])?], PipelineOptions::named("cylinder"))?;
    Ok(pipe)
}

fn main() -> Result<(), AppError> {
    let config = AppConfig::global()?;
    env_logger::Builder::new().parse_filters(&config.log_filter).init();

    let pipe = demo_pipeline()?;
    println!("{pipe}");
    let out = pipe.call(namespace! { "diameter" => 2.0, "length" => 3.0 })?;
    println!("resultado: {}", serde_json::to_string(&out)?);

    let graph = pipe.graph();
    println!("grafo: {}", serde_json::to_string_pretty(&graph)?);

    let with_constants = (let_values(namespace! { "length" => 1.0 })? | pipe.clone())?;
    let timed_pipe = timed(&with_constants)?;
    let record = timed_pipe.call(&[], namespace! { "diameter" => 1.0 })?;
    info!("llamada cronometrada: {:?}", record);

    let columns: Columns = [("diameter".to_string(), vec![json!(1.0), json!(2.0)]),
                            ("length".to_string(), vec![json!(1.0), json!(10.0), json!(100.0)])].into_iter()
                                                                                                .collect();
    let table = full_parametric_study(&pipe, &columns, &config.maps)?;
    println!("estudio paramétrico ({} filas): {}", table.len(), serde_json::to_string(&table)?);
    Ok(())
}
