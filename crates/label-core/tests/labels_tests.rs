use std::sync::Arc;

use label_core::{label, namespace, IntoStep, LabelError, Labelled, LabelledFunction, Namespace, Output, OutputNames};
use serde_json::json;

fn optional_sum() -> LabelledFunction {
    LabelledFunction::builder("f").input("x")
                                  .optional("y", 2)
                                  .build(|a| Ok(Output::single(a.get::<i64>("x")? + a.get::<i64>("y")?)))
                                  .unwrap()
}

fn cube() -> LabelledFunction {
    LabelledFunction::new("cube", &["x"], |a| {
        let x = a.f64("x")?;
        Ok(Output::tuple([12.0 * x, 6.0 * x * x, x * x * x]))
    }).unwrap()
}

#[test]
fn recorded_call_uses_defaults_and_function_name() {
    let f = optional_sum();
    let record = f.recorded_call(&[], namespace! { "x" => 5 }).unwrap();
    assert_eq!(record, namespace! { "x" => 5, "y" => 2, "f" => 7 });
    assert_eq!(f.output_names(), OutputNames::Resolved(vec!["f".into()]));
}

#[test]
fn recorded_call_through_a_step() {
    let step = label(optional_sum());
    let record = step.recorded_call(namespace! { "x" => 5 }).unwrap();
    assert_eq!(record, namespace! { "x" => 5, "y" => 2, "f" => 7 });

    // los inputs fijados no forman parte del registro
    let fixed = label(optional_sum().fix(namespace! { "y" => 10 }).unwrap());
    assert_eq!(fixed.recorded_call(namespace! { "x" => 5 }).unwrap(), namespace! { "x" => 5, "f" => 15 });

    let err = step.recorded_call(Namespace::new()).unwrap_err();
    assert!(matches!(err, LabelError::MissingArgument { .. }));
}

#[test]
fn declared_outputs_never_change() {
    let f = LabelledFunction::builder("annotated_cube").input("x")
                                                       .outputs(["length", "area", "volume"])
                                                       .build(|a| {
                                                           let x = a.f64("x")?;
                                                           Ok(Output::tuple([12.0 * x, 6.0 * x * x, x * x * x]))
                                                       })
                                                       .unwrap();
    let declared = OutputNames::Resolved(vec!["length".into(), "area".into(), "volume".into()]);
    assert_eq!(f.output_names(), declared);
    let out = f.call(&[json!(1.0)], Namespace::new()).unwrap();
    assert_eq!(out, namespace! { "length" => 12.0, "area" => 6.0, "volume" => 1.0 });
    assert_eq!(f.output_names(), declared);
}

#[test]
fn tuple_names_freeze_after_first_call() {
    let flaky = LabelledFunction::new("cube", &["n"], |a| {
                    let n: usize = a.get("n")?;
                    Ok(Output::tuple(vec![0; n]))
                }).unwrap();
    assert_eq!(flaky.output_names(), OutputNames::Unresolved);
    flaky.call(&[json!(3)], Namespace::new()).unwrap();
    assert_eq!(flaky.output_names().names().unwrap(), ["cube[0]", "cube[1]", "cube[2]"]);

    let err = flaky.call(&[json!(2)], Namespace::new()).unwrap_err();
    assert!(matches!(err, LabelError::OutputShapeInconsistency { ref callable, .. } if callable == "cube"));
    // sigue siendo usable
    assert!(flaky.call(&[json!(3)], Namespace::new()).is_ok());

    let c = cube();
    c.call(&[json!(1.0)], Namespace::new()).unwrap();
    assert_eq!(c.output_names().names().unwrap().len(), 3);
}

#[test]
fn labelling_twice_returns_the_same_step() {
    let once = label(cube());
    let twice = label(&once);
    assert!(Arc::ptr_eq(&once, &twice));
    let thrice = label(twice.clone().into_step());
    assert!(Arc::ptr_eq(&once, &thrice));
}

#[test]
fn unexpected_and_missing_arguments() {
    let f = optional_sum();
    let err = f.call(&[], namespace! { "x" => 1, "potato" => 0, "tomato" => 0 }).unwrap_err();
    assert_eq!(err.to_string(), "f got unexpected argument(s): potato, tomato");

    let err = f.call(&[], Namespace::new()).unwrap_err();
    assert_eq!(err, LabelError::MissingArgument { callable: "f".into(), names: vec!["x".into()] });
}

#[test]
fn fix_behaves_like_supplying_the_value() {
    let f = optional_sum();
    let fixed = f.fix(namespace! { "x" => 10 }).unwrap();
    assert_eq!(fixed.input_names(), ["y"]);
    assert_eq!(fixed.fixed_values(), &namespace! { "x" => 10 });
    assert_eq!(fixed.call(&[], Namespace::new()).unwrap(), f.call(&[], namespace! { "x" => 10 }).unwrap());

    let err = f.fix(namespace! { "z" => 1 }).unwrap_err();
    assert!(matches!(err, LabelError::UnexpectedArgument { .. }));
}

#[test]
fn fixing_a_defaulted_input_drops_its_default() {
    let f = optional_sum().fix(namespace! { "y" => 5 }).unwrap();
    assert!(f.default_values().is_empty());
    assert_eq!(f.call(&[json!(1)], Namespace::new()).unwrap(), namespace! { "f" => 6 });
}

#[test]
fn hide_requires_defaults() {
    let f = optional_sum();
    let hidden = f.hide(&["y"]).unwrap();
    assert_eq!(hidden.input_names(), ["x"]);
    assert_eq!(hidden.call(&[json!(1)], Namespace::new()).unwrap(), namespace! { "f" => 3 });

    let err = f.hide(&["x"]).unwrap_err();
    assert_eq!(err, LabelError::UnhidableInput { callable: "f".into(), names: vec!["x".into()] });

    let all_but = f.set_default(namespace! { "x" => 0 }).unwrap().hide_all_but(&["x"]).unwrap();
    assert_eq!(all_but.input_names(), ["x"]);
}

#[test]
fn set_and_reset_defaults() {
    let f = optional_sum().set_default(namespace! { "x" => 1 }).unwrap();
    assert_eq!(f.call(&[], Namespace::new()).unwrap(), namespace! { "f" => 3 });

    let g = f.reset_default(&["x", "y"]).unwrap();
    assert!(g.default_values().is_empty());
    let err = g.reset_default(&["x"]).unwrap_err();
    assert!(matches!(err, LabelError::NoDefaultToReset { .. }));

    let err = f.set_default(namespace! { "w" => 1 }).unwrap_err();
    assert!(matches!(err, LabelError::DefaultForUnknownInput { .. }));
}

#[test]
fn user_errors_carry_callable_name() {
    let f = LabelledFunction::new("sqrt", &["x"], |a| {
                let x = a.f64("x")?;
                if x < 0.0 {
                    return Err(a.fail("negative input"));
                }
                Ok(Output::single(x.sqrt()))
            }).unwrap();
    let err = f.call(&[json!(-1.0)], Namespace::new()).unwrap_err();
    assert_eq!(err.to_string(), "sqrt failed: negative input");
    assert_eq!(err.callable(), "sqrt");
}

#[test]
fn none_result_has_no_outputs() {
    let f = LabelledFunction::new("noop", &[], |_| Ok(Output::None)).unwrap();
    assert!(f.call(&[], Namespace::new()).unwrap().is_empty());
    assert_eq!(Labelled::output_names(&f), OutputNames::Resolved(vec![]));
}

#[test]
fn concurrent_first_calls_agree_on_names() {
    let f = cube();
    std::thread::scope(|s| {
        for i in 0..4 {
            let f = &f;
            s.spawn(move || f.call(&[json!(i)], Namespace::new()).unwrap());
        }
    });
    assert_eq!(f.output_names().names().unwrap(), ["cube[0]", "cube[1]", "cube[2]"]);
}
