use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Knuth's method; fine for the small means used here.
    fn poisson(&mut self, mean: f64) -> i64 {
        let limit = (-mean).exp();
        let mut k = 0;
        let mut p = self.next_f64();
        while p > limit {
            k += 1;
            p *= self.next_f64();
        }
        k
    }
}

const LEAGUES: [&str; 8] = [
    "Premier League",
    "La Liga",
    "Serie A",
    "Bundesliga",
    "Ligue 1",
    "Eredivisie",
    "Primeira Liga",
    "Championship",
];
const TEAMS_PER_LEAGUE: usize = 18;

/// (primary_position, detailed position, shots per 90, xA per 90, key passes per 90)
const ROLES: [(&str, &str, f64, f64, f64); 8] = [
    ("GK", "GK", 0.0, 0.0, 0.05),
    ("D", "CB", 0.4, 0.02, 0.2),
    ("D", "LB", 0.5, 0.08, 0.8),
    ("D", "RB", 0.5, 0.08, 0.8),
    ("M", "DM", 0.8, 0.06, 0.9),
    ("M", "AM", 1.8, 0.18, 2.0),
    ("F", "LW", 2.4, 0.16, 1.6),
    ("F", "ST", 3.0, 0.09, 0.9),
];
/// Roles filled for each squad slot.
const SQUAD: [usize; 22] = [0, 0, 1, 1, 1, 1, 2, 2, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 7, 7, 7];

#[derive(Default)]
struct Columns {
    league_id: Vec<i64>,
    team_id: Vec<i64>,
    player_id: Vec<i64>,
    season_id: Vec<i64>,
    season: Vec<String>,
    player: Vec<String>,
    team: Vec<String>,
    league: Vec<String>,
    position: Vec<String>,
    primary_position: Vec<String>,
    minutes: Vec<i64>,
    goals: Vec<i64>,
    assists: Vec<i64>,
    shots: Vec<i64>,
    xg: Vec<f64>,
    xa: Vec<f64>,
    key_passes: Vec<i64>,
    age: Vec<i64>,
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let mut cols = Columns::default();

    let mut player_id: i64 = 0;
    for (league_idx, league) in LEAGUES.iter().enumerate() {
        for team_idx in 0..TEAMS_PER_LEAGUE {
            let team_id = (league_idx * TEAMS_PER_LEAGUE + team_idx) as i64;
            let team = format!("{} {}", &league[..3], team_idx + 1);

            for &role_idx in &SQUAD {
                let (primary, detailed, shots90, xa90, kp90) = ROLES[role_idx];

                // Regulars play most of the season, squad players far less.
                let minutes = if rng.next_f64() < 0.5 {
                    1800 + rng.below(1621) as i64
                } else {
                    rng.below(1800) as i64
                };
                let nineties = minutes as f64 / 90.0;

                let shots = rng.poisson(shots90 * nineties);
                let xg = shots as f64 * (0.06 + rng.next_f64() * 0.10);
                let goals = rng.poisson(xg);
                let xa = xa90 * nineties * (0.6 + rng.next_f64() * 0.8);
                let assists = rng.poisson(xa);
                let key_passes = rng.poisson(kp90 * nineties);

                cols.league_id.push(league_idx as i64);
                cols.team_id.push(team_id);
                cols.player_id.push(player_id);
                cols.season_id.push(317);
                cols.season.push("2024/2025".to_string());
                cols.player.push(format!("Player {player_id:04}"));
                cols.team.push(team.clone());
                cols.league.push(league.to_string());
                cols.position.push(detailed.to_string());
                cols.primary_position.push(primary.to_string());
                cols.minutes.push(minutes);
                cols.goals.push(goals);
                cols.assists.push(assists);
                cols.shots.push(shots);
                cols.xg.push((xg * 100.0).round() / 100.0);
                cols.xa.push((xa * 100.0).round() / 100.0);
                cols.key_passes.push(key_passes);
                cols.age.push(17 + rng.below(19) as i64);
                player_id += 1;
            }
        }
    }

    let int = |name: &str| Field::new(name, DataType::Int64, false);
    let text = |name: &str| Field::new(name, DataType::Utf8, false);
    let float = |name: &str| Field::new(name, DataType::Float64, false);
    let strings = |v: &[String]| -> ArrayRef {
        Arc::new(StringArray::from(v.iter().map(|s| s.as_str()).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        int("league_id"),
        int("team_id"),
        int("player_id"),
        int("season_id"),
        text("season"),
        text("player"),
        text("team"),
        text("league"),
        text("position"),
        text("primary_position"),
        int("minutes"),
        int("goals"),
        int("assists"),
        int("shots"),
        float("xg"),
        float("xa"),
        int("key_passes"),
        int("age"),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(cols.league_id)),
            Arc::new(Int64Array::from(cols.team_id)),
            Arc::new(Int64Array::from(cols.player_id)),
            Arc::new(Int64Array::from(cols.season_id)),
            strings(&cols.season),
            strings(&cols.player),
            strings(&cols.team),
            strings(&cols.league),
            strings(&cols.position),
            strings(&cols.primary_position),
            Arc::new(Int64Array::from(cols.minutes)),
            Arc::new(Int64Array::from(cols.goals)),
            Arc::new(Int64Array::from(cols.assists)),
            Arc::new(Int64Array::from(cols.shots)),
            Arc::new(Float64Array::from(cols.xg)),
            Arc::new(Float64Array::from(cols.xa)),
            Arc::new(Int64Array::from(cols.key_passes)),
            Arc::new(Int64Array::from(cols.age)),
        ],
    )
    .context("building record batch")?;

    // Write Parquet
    let output_path = "player_season_stats.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {player_id} player-seasons to {output_path}");
    Ok(())
}
