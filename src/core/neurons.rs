use crate::prelude::*;
use std::io::{Read, Write};

/// Per-neuron scratch space for gradient training.
///
/// Holds the last raw weighted sum, the last activated (normalized) sum and
/// the staged weight/bias corrections for the example currently being
/// processed. Corrections are committed only after the whole network has
/// staged its corrections for that example.
#[derive(Debug, Clone)]
pub struct Cache {
    raw_sum: f64,
    normalized_sum: f64,
    weight_correction: Array1<f64>,
    bias_correction: f64,
}

impl Cache {
    fn new(weights: usize) -> Self {
        Self {
            raw_sum: 0.0,
            normalized_sum: 0.0,
            weight_correction: Array1::zeros(weights),
            bias_correction: 0.0,
        }
    }

    pub fn raw_sum(&self) -> f64 {
        self.raw_sum
    }

    pub fn normalized_sum(&self) -> f64 {
        self.normalized_sum
    }

    pub fn weight_correction(&self) -> &Array1<f64> {
        &self.weight_correction
    }

    pub fn bias_correction(&self) -> f64 {
        self.bias_correction
    }
}

/// A single neuron: weight vector, bias, activation selection, a private
/// random stream for initialization/mutation draws, and an optional [`Cache`].
///
/// Input-layer neurons carry exactly one weight pinned to 1.0 and act as
/// per-channel pass-throughs; every other neuron's weight vector is sized to
/// its predecessor layer.
#[derive(Debug, Clone)]
pub struct Neuron {
    weights: Array1<f64>,
    bias: f64,
    activation: Activation,
    rng: StdRng,
    cache: Option<Cache>,
}

impl Neuron {
    /// Builds a zero-weighted neuron whose private stream is seeded from
    /// `seed_source`. Weights stay zero until `randomise` or
    /// `initialize_weights` is called.
    pub fn new<R: Rng>(inputs: usize, seed_source: &mut R, activation: Activation) -> Self {
        Self {
            weights: Array1::zeros(inputs),
            bias: 0.0,
            activation,
            rng: StdRng::seed_from_u64(seed_source.gen()),
            cache: None,
        }
    }

    pub(crate) fn from_parts<R: Rng>(
        weights: Array1<f64>,
        bias: f64,
        activation: Activation,
        seed_source: &mut R,
    ) -> Self {
        Self {
            weights,
            bias,
            activation,
            rng: StdRng::seed_from_u64(seed_source.gen()),
            cache: None,
        }
    }

    /// Computes this neuron's activated output from `weights.len()` contiguous
    /// elements of `inputs` starting at `offset`.
    ///
    /// When the cache is enabled, the raw weighted sum and the activated value
    /// are recorded as a side effect.
    pub fn output(&mut self, inputs: &Array1<f64>, offset: usize) -> Result<f64> {
        let n = self.weights.len();
        if inputs.len() < offset + n {
            return Err(NNError::DimensionMismatch(format!(
                "neuron expects {} inputs at offset {}, got a vector of length {}",
                n,
                offset,
                inputs.len()
            )));
        }
        let mut sum = self.weights.dot(&inputs.slice(s![offset..offset + n])) + self.bias;
        if let Some(cache) = self.cache.as_mut() {
            cache.raw_sum = sum;
        }
        sum = self.activation.function(sum);
        if let Some(cache) = self.cache.as_mut() {
            cache.normalized_sum = sum;
        }
        Ok(sum)
    }

    /// Clamps every weight and the bias into `[-range, range]`.
    pub fn normalize(&mut self, range: f64) -> Result<()> {
        if !(range > 0.0) {
            return Err(NNError::PreconditionViolation(format!(
                "normalize range must be positive, got {}",
                range
            )));
        }
        self.weights.mapv_inplace(|w| w.clamp(-range, range));
        self.bias = self.bias.clamp(-range, range);
        Ok(())
    }

    /// Fills the weight vector with a constant. Used at construction to pin
    /// input-layer weights to 1.0.
    pub fn initialize_weights(&mut self, value: f64) {
        self.weights.fill(value);
    }

    /// Redraws every weight and the bias uniformly from `(-0.5, 0.5)` using
    /// this neuron's own stream.
    pub fn randomise(&mut self) {
        self.weights = Array1::random_using(self.weights.len(), Uniform::new(-0.5, 0.5), &mut self.rng);
        self.bias = self.rng.gen_range(-0.5..0.5);
    }

    /// Rescales the weight vector to Euclidean norm `beta` (direction
    /// preserved) and redraws the bias uniformly from `(-beta, beta)`.
    pub fn nguyen_widrow_rescale(&mut self, beta: f64) {
        let norm = self.weights.dot(&self.weights).sqrt();
        self.weights.mapv_inplace(|w| beta * w / norm);
        self.bias = self.rng.gen_range(-beta..beta);
    }

    /// With probability `chance` (one draw from this neuron's stream),
    /// perturbs each weight and the bias by an independent uniform draw in
    /// `(-rate, rate)`, then clamps the neuron into `[-1, 1]`.
    pub fn mutate(&mut self, chance: f64, rate: f64) -> Result<()> {
        if self.rng.gen::<f64>() <= chance {
            let delta = Array1::random_using(self.weights.len(), Uniform::new(-rate, rate), &mut self.rng);
            self.weights += &delta;
            self.bias += self.rng.gen_range(-rate..rate);
            self.normalize(1.0)?;
        }
        Ok(())
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn set_weight(&mut self, index: usize, value: f64) {
        self.weights[index] = value;
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Stages a weight correction; corrections take effect only at
    /// `commit_correction`.
    pub fn stage_weight_correction(&mut self, index: usize, value: f64) -> Result<()> {
        let cache = self.cache_mut()?;
        cache.weight_correction[index] = value;
        Ok(())
    }

    pub fn stage_bias_correction(&mut self, value: f64) -> Result<()> {
        let cache = self.cache_mut()?;
        cache.bias_correction = value;
        Ok(())
    }

    /// Adds every staged correction into the live weights and bias. Called
    /// once per neuron per training example, after the whole network has
    /// finished staging.
    pub fn commit_correction(&mut self) -> Result<()> {
        let cache = self
            .cache
            .as_ref()
            .ok_or_else(|| no_cache("commit a correction"))?;
        self.weights += &cache.weight_correction;
        self.bias += cache.bias_correction;
        Ok(())
    }

    pub fn enable_cache(&mut self) {
        if self.cache.is_none() {
            self.cache = Some(Cache::new(self.weights.len()));
        }
    }

    pub fn disable_cache(&mut self) {
        self.cache = None;
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    pub fn cache(&self) -> Option<&Cache> {
        self.cache.as_ref()
    }

    pub(crate) fn cached_raw_sum(&self) -> Result<f64> {
        self.cache
            .as_ref()
            .map(Cache::raw_sum)
            .ok_or_else(|| no_cache("read the raw sum"))
    }

    pub(crate) fn cached_normalized_sum(&self) -> Result<f64> {
        self.cache
            .as_ref()
            .map(Cache::normalized_sum)
            .ok_or_else(|| no_cache("read the normalized sum"))
    }

    fn cache_mut(&mut self) -> Result<&mut Cache> {
        self.cache
            .as_mut()
            .ok_or_else(|| no_cache("stage a correction"))
    }

    pub(crate) fn write_record<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_i32(writer, self.weights.len() as i32)?;
        for &weight in self.weights.iter() {
            write_f64(writer, weight)?;
        }
        write_f64(writer, self.bias)?;
        write_i32(writer, self.activation.tag())
    }

    pub(crate) fn read_record<R: Read, G: Rng>(reader: &mut R, seed_source: &mut G) -> Result<Self> {
        let weight_count = read_i32(reader)?;
        if weight_count < 0 {
            return Err(NNError::CorruptModelData(format!(
                "negative weight count {}",
                weight_count
            )));
        }
        let mut weights = Vec::with_capacity(weight_count as usize);
        for _ in 0..weight_count {
            weights.push(read_f64(reader)?);
        }
        let bias = read_f64(reader)?;
        let activation = Activation::from_tag(read_i32(reader)?)?;
        Ok(Self::from_parts(
            Array1::from_vec(weights),
            bias,
            activation,
            seed_source,
        ))
    }
}

fn no_cache(action: &str) -> NNError {
    NNError::PreconditionViolation(format!(
        "cannot {} without an enabled state cache",
        action
    ))
}

// Little-endian scalar framing shared with the model-level records.

pub(crate) fn write_i32<W: Write>(writer: &mut W, value: i32) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_f64<W: Write>(writer: &mut W, value: f64) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn read_i32<R: Read>(reader: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

pub(crate) fn read_f64<R: Read>(reader: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    read_exact(reader, &mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|err| {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            NNError::CorruptModelData("model stream ended early".to_string())
        } else {
            NNError::IoError(err)
        }
    })
}
