//! 見せかけの進捗表示
//!
//! 実際の送受信量とは無関係に、一定間隔でランダムな幅だけ進める。
//! 90% で止まり、結果が届いた時点で停止（成功なら 100%）させる。
//! タイマー自体は各フロントエンドが持つ（WASM: gloo Interval / CLI: tokio interval）。

/// ティック間隔（ミリ秒）
pub const TICK_INTERVAL_MS: u32 = 100;

/// 1ティックで進む最大幅（%）
pub const MAX_STEP: f64 = 10.0;

/// 結果が届くまでの上限（%）
pub const CAP: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TickerState {
    #[default]
    Idle,
    Running,
    /// 上限到達で自然停止
    Capped,
    /// 結果到着で打ち切り
    Stopped,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CosmeticProgress {
    percent: f64,
    state: TickerState,
}

impl CosmeticProgress {
    pub fn start() -> Self {
        Self {
            percent: 0.0,
            state: TickerState::Running,
        }
    }

    /// 1ティック進める
    ///
    /// `unit` は [0, 1) の乱数。戻り値が false になったらタイマーを止めてよい。
    pub fn tick(&mut self, unit: f64) -> bool {
        if self.state != TickerState::Running {
            return false;
        }
        self.percent += unit.clamp(0.0, 1.0) * MAX_STEP;
        if self.percent >= CAP {
            self.percent = CAP;
            self.state = TickerState::Capped;
            return false;
        }
        true
    }

    /// 結果到着。その時点の値で止める
    pub fn stop(&mut self) {
        if matches!(self.state, TickerState::Running | TickerState::Capped) {
            self.state = TickerState::Stopped;
        }
    }

    /// 成功時は 100% 表示にする
    pub fn complete(&mut self) {
        self.percent = 100.0;
        self.state = TickerState::Completed;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn is_ticking(&self) -> bool {
        self.state == TickerState::Running
    }

    pub fn label(&self) -> String {
        format!("Processing... {}%", self.percent.round() as u32)
    }
}
