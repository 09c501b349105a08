use decompose::{
  decomposition::{decomposition_weights, Method, WeightGeneration},
  pareto::{ideal, nadir},
  problems::Zdt,
  Decompose,
  Problem,
};
use rand::prelude::*;

fn main() -> decompose::Result<()> {
  // ZDT1 with 10 decision variables
  let zdt = Zdt::new(1, 10)?;

  // 11 evenly spread weights, one subproblem per weight
  let weights = decomposition_weights(2, 11, WeightGeneration::Grid, 0)?;

  let mut rng = rand::thread_rng();
  let mut front = Vec::new();
  for weight in weights {
    let udp = Decompose::new(
      zdt,
      weight.clone(),
      vec![1.0, 1.0],
      Method::Tchebycheff,
      true,
    )?;
    let problem = Problem::new(udp)?;

    // a crude random search: any single-objective optimizer fits here
    let mut best: Option<(f64, Vec<f64>)> = None;
    for _ in 0..2000 {
      let x: Vec<f64> = (0..10)
        .map(|i| {
          if i == 0 {
            rng.gen_range(0.0..1.0)
          } else {
            rng.gen_range(0.0..0.05)
          }
        })
        .collect();
      let f = problem.fitness(&x)?[0];
      if best.as_ref().map_or(true, |(b, _)| f < *b) {
        best = Some((f, x));
      }
    }

    if let Some((f, x)) = best {
      let objectives = problem.udp().original_fitness(&x)?;
      println!(
        "weight {weight:?}: decomposed {f:.4}, objectives {objectives:.4?}, \
         p-distance {:.4}",
        zdt.p_distance(&x)?
      );
      front.push(objectives);
    }
  }

  println!("ideal: {:?}", ideal(&front)?);
  println!("nadir: {:?}", nadir(&front)?);
  Ok(())
}
