/// Wire field names of the live payload.
///
/// The payload is the deepest object among `root.p.p`, `root.p` and `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub params: String,
    /// Four card indices by seat, `-1` for an empty slot.
    pub table: String,
    /// Remaining card count per seat.
    pub counts: String,
    pub dealer: String,
    /// Seat due to act next. On a cards-collected event this is the trick winner.
    pub mover: String,
    pub stage: String,
    pub mode: String,
    pub trump: String,
    /// Team scores `[team0, team1]`.
    pub scores: String,
    pub hand: String,
    pub bid: String,
    pub bid_seat: String,
    pub bid_round: String,
    pub card: String,
    pub play_seat: String,
    /// Server's own trick result. Unreliable; never used as the winner.
    pub embedded_result: String,
    pub declaration: String,
    pub fold: String,
    pub round_result: String,
    pub doubling: String,
    /// Array of `{name, seat}` objects.
    pub players: String,
    pub player_name: String,
    pub player_seat: String,
    /// Names listed by seat.
    pub positional_names: String,
    /// Stage values meaning bidding is open.
    pub bidding_stages: Vec<String>,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            params: "p".into(),
            table: "tc".into(),
            counts: "hc".into(),
            dealer: "dl".into(),
            mover: "mv".into(),
            stage: "st".into(),
            mode: "gm".into(),
            trump: "tr".into(),
            scores: "sc".into(),
            hand: "hd".into(),
            bid: "bd".into(),
            bid_seat: "bs".into(),
            bid_round: "br".into(),
            card: "cp".into(),
            play_seat: "ps".into(),
            embedded_result: "rs".into(),
            declaration: "prj".into(),
            fold: "kbt".into(),
            round_result: "rr".into(),
            doubling: "dbl".into(),
            players: "pl".into(),
            player_name: "n".into(),
            player_seat: "i".into(),
            positional_names: "pn".into(),
            bidding_stages: vec!["bid".into(), "bidding".into(), "1".into()],
        }
    }
}
