use label_core::{namespace, LabelError, LabelledFunction, Output, Pipeline};
use label_maps::{full_parametric_study, lcartesian_map, lmap, recorded_map, table_map, Columns, MapConfig, MapError,
                 MapInput};
use serde_json::{json, Value};

fn columns(pairs: &[(&str, Vec<Value>)]) -> Columns {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn optional_sum() -> LabelledFunction {
    LabelledFunction::builder("optional_sum").optional("x", 0)
                                             .optional("y", 0)
                                             .build(|a| Ok(Output::single(a.get::<i64>("x")? + a.get::<i64>("y")?)))
                                             .unwrap()
}

fn cube() -> LabelledFunction {
    LabelledFunction::builder("cube").input("x")
                                     .outputs(["length", "area", "volume"])
                                     .build(|a| {
                                         let x = a.f64("x")?;
                                         Ok(Output::tuple([12.0 * x, 6.0 * x * x, x * x * x]))
                                     })
                                     .unwrap()
}

#[test]
fn lmap_zips_keyword_columns() {
    let c = columns(&[("x", vec![json!(1), json!(2), json!(3)]), ("y", vec![json!(10), json!(20), json!(30)])]);
    let out = lmap(optional_sum(), &c, &MapConfig::sequential()).unwrap();
    let sums: Vec<&Value> = out.iter().map(|r| &r["optional_sum"]).collect();
    assert_eq!(sums, vec![&json!(11), &json!(22), &json!(33)]);
}

#[test]
fn recorded_map_keeps_defaults() {
    let c = columns(&[("x", vec![json!(1), json!(2)])]);
    let out = recorded_map(optional_sum(), &c, &MapConfig::sequential()).unwrap();
    assert_eq!(out[1], namespace! { "x" => 2, "y" => 0, "optional_sum" => 2 });
}

#[test]
fn cartesian_map_covers_all_combinations() {
    let c = columns(&[("x", vec![json!(0), json!(1)]), ("y", vec![json!(0), json!(10), json!(20)])]);
    let out = lcartesian_map(optional_sum(), &c, &MapConfig::sequential()).unwrap();
    assert_eq!(out.len(), 6);
    assert_eq!(out[5]["optional_sum"], 21);
}

#[test]
fn table_is_indexed_by_inputs() {
    let c = columns(&[("x", vec![json!(1.0), json!(2.0)])]);
    let table = table_map(cube(), &c, &MapConfig::sequential()).unwrap();
    assert_eq!(table.index(), ["x"]);
    assert_eq!(table.columns(), ["x", "length", "area", "volume"]);
    assert_eq!(table.column("volume").unwrap(), vec![json!(1.0), json!(8.0)]);
    assert_eq!(table.find(&namespace! { "x" => 2.0 }).unwrap()["area"], 24.0);
}

#[test]
fn hidden_inputs_are_not_indexed() {
    let f = optional_sum().hide(&["y"]).unwrap();
    let c = columns(&[("x", vec![json!(1), json!(2)])]);
    let table = table_map(f, &c, &MapConfig::sequential()).unwrap();
    assert_eq!(table.index(), ["x"]);
    assert_eq!(table.columns(), ["x", "optional_sum"]);
}

#[test]
fn parametric_study_of_a_pipeline() {
    let double = LabelledFunction::builder("double").input("length")
                                                    .output("width")
                                                    .build(|a| Ok(Output::single(2.0 * a.f64("length")?)))
                                                    .unwrap();
    let area = LabelledFunction::builder("area").inputs(["length", "width", "depth"])
                                                .output("volume")
                                                .build(|a| {
                                                    Ok(Output::single(a.f64("length")? * a.f64("width")? * a.f64("depth")?))
                                                })
                                                .unwrap();
    let pipe = Pipeline::new([double, area]).unwrap();
    let c = columns(&[("length", vec![json!(1.0), json!(2.0)]), ("depth", vec![json!(1.0), json!(3.0)])]);
    let table = full_parametric_study(&pipe, &c, &MapConfig::sequential()).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.index(), ["length", "depth"]);
    assert_eq!(table.find(&namespace! { "length" => 2.0, "depth" => 3.0 }).unwrap()["volume"], 24.0);
}

#[test]
fn parallel_map_preserves_order() {
    let values: Vec<Value> = (0..200).map(|i| json!(i)).collect();
    let c = columns(&[("x", values.clone()), ("y", values)]);
    let config = MapConfig { parallel: true,
                             max_workers: Some(4),
                             chunk_size: 8 };
    let parallel = lmap(optional_sum(), &c, &config).unwrap();
    let sequential = lmap(optional_sum(), &c, &MapConfig::sequential()).unwrap();
    assert_eq!(parallel, sequential);
    assert_eq!(parallel[199]["optional_sum"], 398);
}

#[test]
fn errors_from_calls_are_propagated() {
    let c = columns(&[("z", vec![json!(1)])]);
    let err = lmap(optional_sum(), &c, &MapConfig::parallel(Some(2))).unwrap_err();
    assert!(matches!(err, MapError::Label(LabelError::UnexpectedArgument { .. })));

    let ragged = columns(&[("x", vec![json!(1), json!(2)]), ("y", vec![json!(1)])]);
    assert!(matches!(lmap(optional_sum(), &ragged, &MapConfig::sequential()),
                     Err(MapError::LengthMismatch { .. })));
}

#[test]
fn lmap_accepts_positional_vectors() {
    let input = MapInput::Positional { positional: vec![vec![json!(1), json!(2)]],
                                       keyword: columns(&[("y", vec![json!(10), json!(20)])]) };
    let out = lmap(optional_sum(), input, &MapConfig::sequential()).unwrap();
    assert_eq!(out[1]["optional_sum"], 22);

    let out = lmap(optional_sum(), MapInput::positional(vec![vec![json!(1)], vec![json!(5)]]), &MapConfig::sequential())
        .unwrap();
    assert_eq!(out, vec![namespace! { "optional_sum" => 6 }]);

    let three = MapInput::positional(vec![vec![json!(1)], vec![json!(1)], vec![json!(1)]]);
    let err = lmap(optional_sum(), three, &MapConfig::sequential()).unwrap_err();
    assert!(matches!(err, MapError::Label(LabelError::TooManyPositional { expected: 2, found: 3, .. })));

    let repeated = MapInput::Positional { positional: vec![vec![json!(1)]],
                                          keyword: columns(&[("x", vec![json!(2)])]) };
    let err = lmap(optional_sum(), repeated, &MapConfig::sequential()).unwrap_err();
    assert!(matches!(err, MapError::Label(LabelError::MultipleValues { .. })));
}

#[test]
fn table_map_over_a_previous_result() {
    let c = columns(&[("x", vec![json!(1.0), json!(2.0)])]);
    let cubes = table_map(cube(), &c, &MapConfig::sequential()).unwrap();

    let twice = LabelledFunction::builder("twice").input("volume")
                                                  .output("double_volume")
                                                  .build(|a| Ok(Output::single(2.0 * a.f64("volume")?)))
                                                  .unwrap();
    let table = table_map(twice, &cubes, &MapConfig::sequential()).unwrap();
    assert_eq!(table.index(), ["volume"]);
    assert_eq!(table.columns(), ["volume", "double_volume"]);
    assert_eq!(table.column("double_volume").unwrap(), vec![json!(2.0), json!(16.0)]);
}
