//! Unit tests for Value enum

use std::cell::Cell;
use std::rc::Rc;

use core_types::{argument, ErrorKind, Value};

#[cfg(test)]
mod value_creation_tests {
    use super::*;

    #[test]
    fn test_value_smi_max() {
        let val = Value::Smi(i32::MAX);
        assert!(matches!(val, Value::Smi(n) if n == i32::MAX));
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from(7), Value::Smi(7));
        assert_eq!(Value::from(1.5), Value::Double(1.5));
        assert_eq!(Value::from("s"), Value::String("s".to_string()));
    }

    #[test]
    fn test_smi_equals_integral_double() {
        assert_eq!(Value::Smi(2), Value::Double(2.0));
        assert_ne!(Value::Smi(2), Value::Double(2.5));
    }
}

#[cfg(test)]
mod value_classification_tests {
    use super::*;

    #[test]
    fn test_primitives_are_not_objects() {
        for v in [
            Value::Undefined,
            Value::Null,
            Value::Boolean(true),
            Value::Smi(1),
            Value::Double(1.0),
            Value::from("s"),
        ] {
            assert!(!v.is_object(), "{:?} must not be an object", v);
        }
    }

    #[test]
    fn test_composites_are_objects() {
        assert!(Value::array(vec![]).is_object());
        assert!(Value::record::<&str>([]).is_object());
        assert!(Value::function(|_, _| Ok(Value::Undefined)).is_object());
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Undefined.type_of(), "undefined");
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::unary(Ok).type_of(), "function");
        assert_eq!(Value::array(vec![]).type_of(), "object");
    }

    #[test]
    fn test_only_functions_are_callable() {
        assert!(Value::unary(Ok).is_callable());
        assert!(!Value::record::<&str>([]).is_callable());
        assert!(!Value::Undefined.is_callable());
    }
}

#[cfg(test)]
mod value_call_tests {
    use super::*;

    #[test]
    fn test_call1_passes_argument() {
        let f = Value::unary(|v| Ok(v));
        assert_eq!(f.call1(Value::Smi(3)), Ok(Value::Smi(3)));
    }

    #[test]
    fn test_call_missing_argument_is_undefined() {
        let f = Value::function(|_this, args| Ok(argument(&args, 1)));
        assert_eq!(f.call(Value::Undefined, vec![Value::Smi(1)]), Ok(Value::Undefined));
    }

    #[test]
    fn test_calling_undefined_throws_type_error() {
        let thrown = Value::Undefined.call1(Value::Null).unwrap_err();
        assert_eq!(thrown.as_error().map(|e| e.kind), Some(ErrorKind::TypeError));
    }

    #[test]
    fn test_closures_share_state() {
        let counter = Rc::new(Cell::new(0));
        let c = counter.clone();
        let f = Value::function(move |_, _| {
            c.set(c.get() + 1);
            Ok(Value::Undefined)
        });
        f.call(Value::Undefined, vec![]).unwrap();
        f.call(Value::Undefined, vec![]).unwrap();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_as_array_snapshot() {
        let arr = Value::array(vec![Value::Smi(1)]);
        assert_eq!(arr.as_array(), Some(vec![Value::Smi(1)]));
        assert_eq!(Value::Null.as_array(), None);
    }
}
