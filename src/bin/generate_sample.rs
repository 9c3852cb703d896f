use tiff::encoder::{colortype, TiffEncoder};

const SIZE: usize = 64;
const OUTPUT_PATH: &str = "synthetic_star.tiff";

fn gaussian3(p: [f64; 3], mu: [f64; 3], sigma: f64, amplitude: f64) -> f64 {
    let d2 = (p[0] - mu[0]).powi(2) + (p[1] - mu[1]).powi(2) + (p[2] - mu[2]).powi(2);
    amplitude * (-d2 / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // A star-like particle: a bright core plus six spikes along the axes.
    let c = SIZE as f64 / 2.0;
    let spike = 18.0;
    let mut blobs: Vec<([f64; 3], f64, f64)> = vec![([c, c, c], 10.0, 255.0)];
    for axis in 0..3 {
        for sign in [-1.0, 1.0] {
            let mut mu = [c, c, c];
            mu[axis] += sign * spike;
            blobs.push((mu, 6.0, 180.0));
        }
    }

    let file = std::fs::File::create(OUTPUT_PATH).expect("Failed to create output file");
    let mut encoder = TiffEncoder::new(file).expect("Failed to create TIFF encoder");

    // One page per z-slice, row-major, so loaders see x varying fastest.
    for z in 0..SIZE {
        let mut slice = Vec::with_capacity(SIZE * SIZE);
        for y in 0..SIZE {
            for x in 0..SIZE {
                let p = [x as f64, y as f64, z as f64];
                let signal: f64 = blobs
                    .iter()
                    .map(|&(mu, sigma, amp)| gaussian3(p, mu, sigma, amp))
                    .sum();
                let value = signal + rng.gauss(0.0, 4.0);
                slice.push(value.clamp(0.0, 255.0) as u8);
            }
        }
        encoder
            .write_image::<colortype::Gray8>(SIZE as u32, SIZE as u32, &slice)
            .expect("Failed to write TIFF page");
    }

    println!(
        "Wrote {SIZE}x{SIZE}x{SIZE} synthetic volume to {OUTPUT_PATH} \
         (copy it into the data directory and add a datasets.json entry to use it)"
    );
}
