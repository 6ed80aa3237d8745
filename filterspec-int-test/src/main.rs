use filterspec::errors::FilterResult;
use filterspec::rule::{and, field, not, or, Rule};
use filterspec_int_test::test_util::{create_test_context, monitoring_schema};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_rule(rng: &mut StdRng) -> Rule {
    let atoms: Vec<Rule> = (0..rng.random_range(1..8))
        .map(|i| match i % 4 {
            0 => field("status").eq("running"),
            1 => field("cpu.load").gt(rng.random_range(0..100)),
            2 => field("tags").size(rng.random_range(0..4u64)),
            _ => not(field("age").lt(rng.random_range(0..120))),
        })
        .collect();
    if rng.random_bool(0.5) {
        and(atoms)
    } else {
        or(atoms)
    }
}

fn main() -> FilterResult<()> {
    colog::init();
    println!("Starting stress test...");
    let ctx = create_test_context()?;
    let compiler = ctx.compiler();
    let mut rng = StdRng::seed_from_u64(42);

    let count = 100_000;
    let payloads: Vec<String> = (0..count)
        .map(|_| serde_json::to_string(&random_rule(&mut rng)).unwrap_or_default())
        .collect();

    let start = std::time::Instant::now();
    let mut compiled = 0;
    for payload in &payloads {
        compiler.compile_json(payload)?;
        compiled += 1;
    }
    println!("Compiled {} rules in {:?}", compiled, start.elapsed());

    let start = std::time::Instant::now();
    for _ in 0..1_000 {
        ctx.registry().swap(monitoring_schema()?);
    }
    println!(
        "Swapped schema {} times in {:?}",
        ctx.registry().generation(),
        start.elapsed()
    );

    log::info!("Stress test finished");
    Ok(())
}
