//! Read an array attribute into a typed handle, grow it, write it back.

use varray::{ArrayHandle, Endpoint, MemorySession, NodeId, Variant};

fn main() -> varray::Result<()> {
    tracing_subscriber::fmt::init();

    let session = MemorySession::new();
    let node = NodeId::string(1, "the.answer");
    session.register_node(node.clone(), Variant::from_slice(&[40i32, 41, 42]))?;

    let var = session.read_attribute(&node)?;
    let len = var.len();
    let mut array = ArrayHandle::<i32>::adopt(var, len)?;

    println!("values are: {}", array);

    println!("adding 10 elements");
    for i in 0..10 {
        array.append(i)?;
    }

    println!("sending array");
    session.write_attribute(&node, array.variant())?;

    let var = session.read_attribute(&node)?;
    let len = var.len();
    let array = ArrayHandle::<i32>::adopt(var, len)?;
    println!("node now holds {} values: {}", array.len(), array);

    Ok(())
}
