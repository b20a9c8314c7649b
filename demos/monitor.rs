//! Watch a node for value changes while another thread writes to it.

use std::sync::Arc;
use std::time::Duration;
use varray::{
    ArrayHandle, Endpoint, MemorySession, MonitorFilter, NodeEvent, NodeId, Variant,
};

fn main() -> varray::Result<()> {
    tracing_subscriber::fmt::init();

    let session = Arc::new(MemorySession::new());
    let node = NodeId::string(1, "the.answer");
    session.register_node(node.clone(), Variant::from_slice(&[42i32]))?;

    let handle = session.monitor(MonitorFilter::values_of(vec![node.clone()]));
    println!("monitoring {}", node);

    let writer = {
        let session = Arc::clone(&session);
        let node = node.clone();
        std::thread::spawn(move || -> varray::Result<()> {
            for _ in 0..5 {
                std::thread::sleep(Duration::from_millis(100));

                let var = session.read_attribute(&node)?;
                let len = var.len();
                let mut array = ArrayHandle::<i32>::adopt(var, len)?;
                array.append(array.len() as i32)?;
                session.write_attribute(&node, array.variant())?;
            }
            Ok(())
        })
    };

    for _ in 0..5 {
        match handle.recv_timeout(Duration::from_secs(5)) {
            Ok(NodeEvent::ValueChanged { mut value, .. }) => {
                println!("the answer has changed, new size {}", value.len());

                // Borrow the event's variant for the duration of handling.
                let len = value.len();
                let array = ArrayHandle::<i32>::attach(&mut value, len)?;
                println!("values are: {}", array);
            }
            Ok(NodeEvent::Dropped { reason }) => {
                println!("monitor dropped: {:?}", reason);
                break;
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }

    writer.join().expect("writer thread panicked")?;
    Ok(())
}
