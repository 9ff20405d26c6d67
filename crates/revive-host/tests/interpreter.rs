use super::*;
use crate::host::Host;
use revive_common::SourceKind;
use revive_tracker::EvalContext;

fn eval(source: &str) -> HostValue {
    let host = TreeWalkHost::new();
    Host::evaluate(&*host, source, EvalContext::new(SourceKind::Script, None)).unwrap()
}

#[test]
fn format_number_renders_integral_values_without_a_decimal_point() {
    assert_eq!(format_number(3.0), "3");
    assert_eq!(format_number(-12.0), "-12");
    assert_eq!(format_number(1.5), "1.5");
}

#[test]
fn to_number_coerces_booleans_and_nullish_values() {
    assert_eq!(to_number(&HostValue::Boolean(true)), 1.0);
    assert_eq!(to_number(&HostValue::Boolean(false)), 0.0);
    assert_eq!(to_number(&HostValue::Null), 0.0);
    assert!(to_number(&HostValue::Undefined).is_nan());
    assert_eq!(to_number(&HostValue::String(std::rc::Rc::from("42"))), 42.0);
}

#[test]
fn to_display_string_joins_array_elements_with_commas() {
    let array = eval("[1, 2, 3]");
    assert_eq!(to_display_string(&array), "1,2,3");
}

#[test]
fn for_loop_accumulates_across_iterations() {
    let result = eval(
        r"
        var total = 0;
        for (var i = 0; i < 5; i++) { total += i; }
        total;
        ",
    );
    assert!(matches!(result, HostValue::Number(n) if n == 10.0));
}

#[test]
fn for_of_iterates_array_elements() {
    let result = eval(
        r"
        var sum = 0;
        for (var v of [10, 20, 30]) { sum += v; }
        sum;
        ",
    );
    assert!(matches!(result, HostValue::Number(n) if n == 60.0));
}

#[test]
fn for_in_iterates_enumerable_own_keys() {
    let result = eval(
        r"
        var seen = '';
        for (var k in { a: 1, b: 2 }) { seen += k; }
        seen;
        ",
    );
    assert!(matches!(&result, HostValue::String(s) if s.as_ref() == "ab"));
}

#[test]
fn try_catch_binds_the_thrown_value_and_runs_finally() {
    let result = eval(
        r"
        var order = '';
        try {
            throw 'boom';
        } catch (e) {
            order += e;
        } finally {
            order += '!';
        }
        order;
        ",
    );
    assert!(matches!(&result, HostValue::String(s) if s.as_ref() == "boom!"));
}

#[test]
fn switch_falls_through_absent_breaks() {
    let result = eval(
        r"
        function classify(n) {
            var out = '';
            switch (n) {
                case 1:
                    out += 'one';
                case 2:
                    out += 'two';
                    break;
                default:
                    out += 'other';
            }
            return out;
        }
        classify(1);
        ",
    );
    assert!(matches!(&result, HostValue::String(s) if s.as_ref() == "onetwo"));
}

#[test]
fn rest_parameters_collect_trailing_arguments_into_an_array() {
    let result = eval(
        r"
        function sum(first, ...rest) {
            var total = first;
            for (var i = 0; i < rest.length; i++) { total += rest[i]; }
            return total;
        }
        sum(1, 2, 3, 4);
        ",
    );
    assert!(matches!(result, HostValue::Number(n) if n == 10.0));
}

#[test]
fn destructured_parameters_bind_object_properties() {
    let result = eval(
        r"
        function area({ width, height }) { return width * height; }
        area({ width: 3, height: 4 });
        ",
    );
    assert!(matches!(result, HostValue::Number(n) if n == 12.0));
}

#[test]
fn labeled_break_exits_the_labeled_loop_only() {
    let result = eval(
        r"
        var count = 0;
        outer: for (var i = 0; i < 3; i++) {
            for (var j = 0; j < 3; j++) {
                if (j === 1) { break outer; }
                count++;
            }
        }
        count;
        ",
    );
    assert!(matches!(result, HostValue::Number(n) if n == 1.0));
}
