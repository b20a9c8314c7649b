//! Error handling and edge case tests.

use varray::{
    ArrayHandle, Endpoint, Error, MemorySession, NodeId, TypeTag, Variant,
};

fn answer_node() -> NodeId {
    NodeId::string(1, "the.answer")
}

// --- Claim Errors ---

#[test]
fn test_claim_wrong_tag() {
    let var = Variant::from_slice(&[1i32, 2]);
    let result = ArrayHandle::<f32>::adopt(var, 2);
    assert!(matches!(
        result,
        Err(Error::TypeMismatch {
            expected: TypeTag::Float32,
            got: TypeTag::Int32
        })
    ));
}

#[test]
fn test_claim_every_tag_pairing() {
    // Every wrong pairing fails; the matching one succeeds.
    let mut int_var = Variant::from_slice(&[1i32]);
    assert!(ArrayHandle::<f32>::attach(&mut int_var, 1).is_err());
    assert!(ArrayHandle::<f64>::attach(&mut int_var, 1).is_err());
    assert!(ArrayHandle::<i32>::attach(&mut int_var, 1).is_ok());

    let mut float_var = Variant::from_slice(&[1.0f32]);
    assert!(ArrayHandle::<i32>::attach(&mut float_var, 1).is_err());
    assert!(ArrayHandle::<f32>::attach(&mut float_var, 1).is_ok());
}

#[test]
fn test_claim_count_beyond_buffer() {
    let mut var = Variant::from_slice(&[1.0f64; 4]);
    let result = ArrayHandle::<f64>::attach(&mut var, 5);
    assert!(matches!(
        result,
        Err(Error::LengthMismatch {
            claimed: 5,
            available: 4
        })
    ));
}

#[test]
fn test_raw_parts_byte_length_mismatch() {
    // 10 bytes cannot hold 3 int32 elements.
    let result = Variant::from_raw_parts(TypeTag::Int32, 3, vec![0u8; 10]);
    assert!(matches!(result, Err(Error::LengthMismatch { .. })));
}

// --- Access Errors ---

#[test]
fn test_access_out_of_bounds_is_reported_not_undefined() {
    let mut array = ArrayHandle::<i32>::alloc(3).unwrap();

    assert!(matches!(
        array.at(3),
        Err(Error::OutOfBounds { index: 3, len: 3 })
    ));
    assert!(array.set(usize::MAX, 1).is_err());

    // The failed set mutated nothing.
    assert_eq!(array.to_vec(), vec![0, 0, 0]);
}

#[test]
fn test_empty_array_has_no_valid_index() {
    let array = ArrayHandle::<f64>::alloc(0).unwrap();
    assert!(array.at(0).is_err());
}

// --- Ownership Errors ---

#[test]
fn test_reallocating_ops_rejected_on_borrowed() {
    let mut var = Variant::from_slice(&[1i32, 2, 3]);
    let mut array = ArrayHandle::<i32>::attach(&mut var, 3).unwrap();

    assert!(matches!(array.append(4), Err(Error::NotOwning { op: "append" })));
    assert!(matches!(array.resize(1), Err(Error::NotOwning { op: "resize" })));

    // The lender's buffer is untouched by the failures.
    drop(array);
    assert_eq!(var, Variant::from_slice(&[1i32, 2, 3]));
}

// --- Session Errors ---

#[test]
fn test_read_unknown_node() {
    let session = MemorySession::new();
    let result = session.read_attribute(&answer_node());
    assert!(matches!(result, Err(Error::NodeNotFound(_))));
}

#[test]
fn test_write_unknown_node() {
    let session = MemorySession::new();
    let result = session.write_attribute(&answer_node(), &Variant::from_slice(&[1i32]));
    assert!(matches!(result, Err(Error::NodeNotFound(_))));
}

#[test]
fn test_write_changing_node_tag() {
    let session = MemorySession::new();
    session
        .register_node(answer_node(), Variant::from_slice(&[1i32]))
        .unwrap();

    let result = session.write_attribute(&answer_node(), &Variant::from_slice(&[1.0f32]));
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));

    // Stored value still readable with the registered tag.
    let var = session.read_attribute(&answer_node()).unwrap();
    assert_eq!(var.tag(), TypeTag::Int32);
}

#[test]
fn test_error_messages_name_the_problem() {
    let err = Error::TypeMismatch {
        expected: TypeTag::Int32,
        got: TypeTag::Float64,
    };
    assert_eq!(err.to_string(), "Type mismatch: expected int32, got float64");

    let err = Error::OutOfBounds { index: 9, len: 3 };
    assert_eq!(err.to_string(), "Index out of bounds: 9 >= 3");

    let err = Error::NodeNotFound(answer_node());
    assert_eq!(err.to_string(), "Node not found: ns=1;s=the.answer");
}
