use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use lsnet::{FlowKey, Host, Link, Router, RouterTables};

/// Two hosts joined by a two-router label-switched path:
///
/// h1 -- r1(if0) r1(if1) -- r2(if0) r2(if1) -- h2
///
/// r1 labels the flow on ingress and forwards it label-switched; r2
/// strips the label before handing the packet to h2.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let (h1, h1_wire) = Host::new("1");
    let (h2, h2_wire) = Host::new("2");

    let mut t1 = RouterTables::default();
    t1.encap.insert(FlowKey::new("1", "2", 0), 7);
    t1.fwd.insert(7, 1);
    t1.decap.insert(1, 1); // keep label-switched toward r2
    let (r1, mut r1_wires) = Router::new("r1", &[500, 500], t1, 8);

    let mut t2 = RouterTables::default();
    t2.fwd.insert(7, 1);
    t2.decap.insert(1, 0); // strip the label before the host
    let (r2, mut r2_wires) = Router::new("r2", &[500, 500], t2, 8);

    let cancel = CancellationToken::new();
    tokio::spawn(Link::new(h1_wire, r1_wires.remove(0)).run(cancel.clone()));
    tokio::spawn(Link::new(r1_wires.remove(0), r2_wires.remove(0)).run(cancel.clone()));
    tokio::spawn(Link::new(r2_wires.remove(0), h2_wire).run(cancel.clone()));
    tokio::spawn(r1.run(cancel.clone()));
    tokio::spawn(r2.run(cancel.clone()));

    let (delivery_tx, mut delivery) = tokio::sync::mpsc::channel(16);
    tokio::spawn(h2.run(cancel.clone(), delivery_tx));

    for i in 0..3 {
        let payload = Bytes::from(format!("message {i}"));
        h1.send("2", payload, 0).unwrap();
    }

    for _ in 0..3 {
        let pkt = delivery.recv().await.unwrap();
        println!(
            "h2 received {:?} from host {}",
            String::from_utf8_lossy(pkt.payload()),
            pkt.src()
        );
    }

    cancel.cancel();
}
