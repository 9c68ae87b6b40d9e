use cordyceps_rbtree::{debug::dotgraph, model::ModelSet};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut set = ModelSet::new();

    for key in [2, 0, 3, 4, 5, 1, 6] {
        set.insert(key);
        set.assert_invariants();
        info!(key, keys = ?set.keys(), "inserted");
    }

    let zero = set.pop_first();
    assert_eq!(zero, Some(0));
    set.assert_invariants();
    info!(keys = ?set.keys(), "popped first");

    set.remove(4);
    set.assert_invariants();
    info!(keys = ?set.keys(), "removed 4");

    let mut graph = String::new();
    dotgraph(set.arena(), set.root(), "demo", &mut graph, |n| set.arena()[n])
        .expect("writing to a String cannot fail");
    println!("{graph}");
}
