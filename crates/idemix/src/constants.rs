/// AID of the idemix applet, the ASCII encoding of "idemix"
pub const IDEMIX_AID: &[u8] = b"idemix";

/// Class byte of ISO 7816 interindustry commands
pub const CLA_ISO7816: u8 = 0x00;
/// Class byte of the idemix applet's proprietary commands
pub const CLA_IDEMIX: u8 = 0x80;

/// SELECT
pub const INS_SELECT: u8 = 0xA4;
/// SELECT by DF name (AID)
pub const P1_SELECT_BY_NAME: u8 = 0x04;
/// VERIFY of the card holder PIN
pub const INS_VERIFY: u8 = 0x20;

/// Generate the master secret on the card
pub const INS_GENERATE_SECRET: u8 = 0x01;

/// Start issuance into a credential slot (P1 P2)
pub const INS_ISSUE_CREDENTIAL: u8 = 0x10;
/// Issuer public key modulus n
pub const INS_ISSUE_PUBLIC_KEY_N: u8 = 0x11;
/// Issuer public key element Z
pub const INS_ISSUE_PUBLIC_KEY_Z: u8 = 0x12;
/// Issuer public key element S
///
/// Reserved by the applet, which derives S itself; issuance never sends it.
pub const INS_ISSUE_PUBLIC_KEY_S: u8 = 0x13;
/// Issuer public key bases R_i, indexed by P1
pub const INS_ISSUE_PUBLIC_KEY_R: u8 = 0x14;
/// Attribute value at the key index in P1
pub const INS_ISSUE_ATTRIBUTES: u8 = 0x15;
/// Round 1: issuer nonce n_1 in, commitment U out
pub const INS_ISSUE_NONCE_1: u8 = 0x16;
/// Round 1: proof of correctness of U, part selected by P1
pub const INS_ISSUE_PROOF_U: u8 = 0x17;
/// Round 1: recipient nonce n_2
pub const INS_ISSUE_NONCE_2: u8 = 0x18;
/// Round 3: signature (A, e, v'') and its verification
pub const INS_ISSUE_SIGNATURE: u8 = 0x19;
/// Round 3: issuer proof of correctness of A
pub const INS_ISSUE_PROOF_A: u8 = 0x1A;

/// Start a proof over the credential slot in P1 P2
pub const INS_PROVE_CREDENTIAL: u8 = 0x20;
/// Key indices of the revealed attributes
pub const INS_PROVE_SELECTION: u8 = 0x21;
/// Verifier nonce in, challenge out
pub const INS_PROVE_NONCE: u8 = 0x22;
/// Randomized signature, part selected by P1
pub const INS_PROVE_SIGNATURE: u8 = 0x23;
/// Revealed attribute value at the key index in P1
pub const INS_PROVE_ATTRIBUTE: u8 = 0x24;
/// Response value of a hidden attribute at the key index in P1
pub const INS_PROVE_RESPONSE: u8 = 0x25;

/// Challenge c
pub const P1_PROOF_U_C: u8 = 0x00;
/// Response v'^
pub const P1_PROOF_U_VPRIMEHAT: u8 = 0x01;
/// Response of the master secret
pub const P1_PROOF_U_S_A: u8 = 0x02;

/// Signature element A
pub const P1_SIGNATURE_A: u8 = 0x00;
/// Exponent e
pub const P1_SIGNATURE_E: u8 = 0x01;
/// Blinding v'' in issuance, v^ in proofs
pub const P1_SIGNATURE_V: u8 = 0x02;
/// Verify the stored signature
pub const P1_SIGNATURE_VERIFY: u8 = 0x03;

/// Challenge c'
pub const P1_PROOF_A_C: u8 = 0x00;
/// Response s_e
pub const P1_PROOF_A_S_E: u8 = 0x01;
/// Verify the proof of A
pub const P1_PROOF_A_VERIFY: u8 = 0x02;

/// Key index of the master secret, held only on the card
pub const MASTER_SECRET_INDEX: u8 = 0x00;

/// Names the proof engine uses for values exchanged with the card
pub mod names {
    /// s-value of the master secret
    pub const MASTER_SECRET: &str = "m_0";
    /// Common value carrying the blinded randomness response of round 1
    pub const V_HAT_PRIME: &str = "vHatPrime";
    /// s-value of the signature exponent in the round 3 correctness proof
    pub const S_E: &str = "s_e";
}

/// Messages reported for status words of specific commands
pub mod messages {
    /// Slot already holds a credential (6986 on start of issuance)
    pub const CREDENTIAL_ALREADY_ISSUED: &str = "Credential already issued.";
    /// Empty slot (6A88 on start of a proof)
    pub const CREDENTIAL_NOT_FOUND: &str = "Credential not found.";
    /// Card already personalized (6986 on secret generation)
    pub const MASTER_SECRET_ALREADY_SET: &str = "Master secret already set.";
    /// No PIN tries left
    pub const PIN_BLOCKED: &str = "PIN blocked.";
}
