use typed_builder::TypedBuilder;

/// Session construction options.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct GameBoyConfig {
    /// Host audio rate in Hz.
    #[builder(default = 44_100)]
    pub sample_rate: u32,
    /// Stereo frames buffered before the oldest are dropped.
    #[builder(default = 8_192)]
    pub audio_capacity: usize,
    /// Fill WRAM/HRAM from a fixed-seed generator at power-on instead of
    /// zeroes.
    #[builder(default = true)]
    pub randomize_ram: bool,
    /// Free-form tag stored in every snapshot.
    #[builder(default = String::from("dmgboy"), setter(into))]
    pub snapshot_info: String,
}

impl Default for GameBoyConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
