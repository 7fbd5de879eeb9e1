use env_logger::Env;
use log::info;
use loss_catalog::{resolve, LossKind};
use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("loss_catalog=info,main=info")).init();

    // Optional loss kind to train with, as a label ("BinCE") or name ("mean_squared")
    let training_kind = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<LossKind>()?,
        None => LossKind::BinaryCrossEntropy,
    };

    let mut rng = rand::rng();

    // Random softmax batch with one-hot targets
    let batch_size = 4;
    let classes = 3;
    let mut estimate = Vec::with_capacity(batch_size);
    let mut ideal = Vec::with_capacity(batch_size);
    for _ in 0..batch_size {
        let logits: Vec<f64> = (0..classes).map(|_| rng.random_range(-2.0..2.0)).collect();
        estimate.push(softmax(&logits));

        let mut target = vec![0.0; classes];
        target[rng.random_range(0..classes)] = 1.0;
        ideal.push(target);
    }

    info!("Scoring a random batch of {} samples with {} classes", batch_size, classes);
    for kind in LossKind::ALL {
        let function = resolve(kind);
        match function.f(&estimate, &ideal) {
            Some(loss) => info!("{:>5} -> {:<5} loss = {:.6}", kind, function.label(), loss),
            None => info!("{:>5} -> {:<5} loss computed by the caller", kind, function.label()),
        }
    }

    // Policy gradient seeds for a single chosen action
    let pi = estimate[0][0];
    let delta = rng.random_range(-1.0..1.0);
    let gamma = 0.99;
    info!(
        "APG seed = {:.6}, CPG seed = {:.6} (pi = {:.3}, delta = {:.3})",
        resolve(LossKind::ActorPolicyGradient).df(pi, delta, 1.0),
        resolve(LossKind::CriticPolicyGradient).df(pi, delta * gamma, 1.0),
        pi,
        delta
    );

    let losses = train_logistic_unit(training_kind, 100, 0.5, &mut rng);
    info!("Final {} loss: {}", training_kind, losses.last().unwrap_or(&f64::NAN));

    Ok(())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&x| (x - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|&x| x / total).collect()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Fit `sigmoid(w * x + b)` to a threshold at 0.5 using the seed from `kind`
fn train_logistic_unit<R: Rng>(kind: LossKind, epochs: usize, learning_rate: f64, rng: &mut R) -> Vec<f64> {
    let function = resolve(kind);

    let inputs: Vec<f64> = (0..32).map(|_| rng.random_range(0.0..1.0)).collect();
    let targets: Vec<Vec<f64>> = inputs
        .iter()
        .map(|&x| vec![if x > 0.5 { 1.0 } else { 0.0 }])
        .collect();

    let mut w = rng.random_range(-0.1..0.1);
    let mut b = 0.0;
    let mut losses = Vec::with_capacity(epochs);

    for epoch in 0..epochs {
        let mut outputs = Vec::with_capacity(inputs.len());
        let mut grad_w = 0.0;
        let mut grad_b = 0.0;

        for (&x, target) in inputs.iter().zip(&targets) {
            let y = sigmoid(w * x + b);
            // Sigmoid derivative, consumed by the losses that do not cancel it
            let seed = function.df(y, target[0], y * (1.0 - y));
            grad_w += seed * x;
            grad_b += seed;
            outputs.push(vec![y]);
        }

        w -= learning_rate * grad_w / inputs.len() as f64;
        b -= learning_rate * grad_b / inputs.len() as f64;

        let loss = function.f(&outputs, &targets).unwrap_or(f64::NAN);
        losses.push(loss);

        if epoch % 20 == 0 || epoch == epochs - 1 {
            info!("Epoch {}: {} = {:.6}", epoch, function.label(), loss);
        }
    }

    losses
}
