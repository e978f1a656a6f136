//! Minimal script interpreter
//!
//! Executes exactly the operations needed to validate a P2PKH spend: data
//! pushes, OP_DUP, OP_HASH160, OP_EQUAL, OP_EQUALVERIFY and OP_CHECKSIG.
//! Each call owns its stack; signature checks go through a [`SignatureChecker`]
//! so the interpreter never needs to know about transactions.

use crate::constants::*;
use crate::error::{Result, SigningError};
use crate::hash::hash160;
use crate::script::{Opcode, Script, ScriptElement};
use crate::types::ByteString;
use log::trace;

/// Verifies a `<signature || sighash byte>` blob against a serialized public key
///
/// Returns `Ok(false)` for a well-formed signature that does not verify and
/// `Err` when either blob cannot be parsed.
pub trait SignatureChecker {
    fn check_signature(
        &self,
        signature: &[u8],
        public_key: &[u8],
        script_code: &Script,
    ) -> Result<bool>;
}

/// EvalScript: run `script` against `stack`
///
/// `Ok(false)` means an operation failed (empty stack, unequal values, bad
/// signature). Malformed scripts and exceeded limits are errors.
pub fn eval_script(
    script: &Script,
    stack: &mut Vec<ByteString>,
    checker: &dyn SignatureChecker,
) -> Result<bool> {
    if script.len() > MAX_SCRIPT_SIZE {
        return Err(SigningError::ScriptShape(format!(
            "script of {} bytes exceeds {}",
            script.len(),
            MAX_SCRIPT_SIZE
        )));
    }

    for element in script.elements()? {
        if !execute_element(element, stack, script, checker)? {
            return Ok(false);
        }
        if stack.len() > MAX_STACK_SIZE {
            return Err(SigningError::ScriptShape("stack overflow".to_string()));
        }
    }
    Ok(true)
}

/// VerifyScript: evaluate the unlocking script, then the locking script on
/// the resulting stack, and require a true value on top
pub fn verify_script(
    unlocking: &Script,
    locking: &Script,
    checker: &dyn SignatureChecker,
) -> Result<bool> {
    if !unlocking.is_push_only() {
        return Err(SigningError::ScriptShape(
            "unlocking script must contain only pushes".to_string(),
        ));
    }

    let mut stack = Vec::new();
    if !eval_script(unlocking, &mut stack, checker)? {
        return Ok(false);
    }
    if !eval_script(locking, &mut stack, checker)? {
        return Ok(false);
    }
    Ok(stack.last().map(|top| cast_to_bool(top)).unwrap_or(false))
}

/// Script truthiness: any non-zero byte, except a lone sign bit in the last byte
pub fn cast_to_bool(value: &[u8]) -> bool {
    for (i, byte) in value.iter().enumerate() {
        if *byte != 0 {
            return !(i == value.len() - 1 && *byte == 0x80);
        }
    }
    false
}

fn execute_element(
    element: ScriptElement,
    stack: &mut Vec<ByteString>,
    script_code: &Script,
    checker: &dyn SignatureChecker,
) -> Result<bool> {
    let op = match element {
        ScriptElement::Push(data) => {
            if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
                return Err(SigningError::ScriptShape(format!(
                    "push of {} bytes exceeds {}",
                    data.len(),
                    MAX_SCRIPT_ELEMENT_SIZE
                )));
            }
            stack.push(data);
            return Ok(true);
        }
        ScriptElement::Op(op) => op,
    };
    trace!("Executing {} with stack depth {}", op.name(), stack.len());

    match op {
        Opcode::Dup => match stack.last().cloned() {
            Some(item) => {
                stack.push(item);
                Ok(true)
            }
            None => Ok(false),
        },

        Opcode::Hash160 => match stack.pop() {
            Some(item) => {
                stack.push(hash160(&item).to_vec());
                Ok(true)
            }
            None => Ok(false),
        },

        Opcode::Equal | Opcode::EqualVerify => {
            if stack.len() < 2 {
                return Ok(false);
            }
            let b = stack.pop().unwrap_or_default();
            let a = stack.pop().unwrap_or_default();
            let equal = a == b;
            if op == Opcode::EqualVerify {
                Ok(equal)
            } else {
                stack.push(if equal { vec![1] } else { vec![] });
                Ok(true)
            }
        }

        Opcode::CheckSig => {
            if stack.len() < 2 {
                return Ok(false);
            }
            let public_key = stack.pop().unwrap_or_default();
            let signature = stack.pop().unwrap_or_default();
            let valid = checker.check_signature(&signature, &public_key, script_code)?;
            stack.push(if valid { vec![1] } else { vec![] });
            Ok(true)
        }

        Opcode::Other(byte) => Err(SigningError::ScriptShape(format!(
            "unsupported opcode 0x{:02x}",
            byte
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{OP_CHECKSIG, OP_DUP, OP_EQUAL};
    use std::cell::Cell;

    /// Accepts exactly one (signature, public key) pair
    struct FixedChecker {
        signature: Vec<u8>,
        public_key: Vec<u8>,
        calls: Cell<usize>,
    }

    impl FixedChecker {
        fn new(signature: &[u8], public_key: &[u8]) -> Self {
            FixedChecker {
                signature: signature.to_vec(),
                public_key: public_key.to_vec(),
                calls: Cell::new(0),
            }
        }
    }

    impl SignatureChecker for FixedChecker {
        fn check_signature(
            &self,
            signature: &[u8],
            public_key: &[u8],
            _script_code: &Script,
        ) -> Result<bool> {
            self.calls.set(self.calls.get() + 1);
            if signature.is_empty() {
                return Err(SigningError::InvalidEncoding("empty signature".to_string()));
            }
            Ok(signature == self.signature.as_slice() && public_key == self.public_key.as_slice())
        }
    }

    fn p2pkh_pair(signature: &[u8], public_key: &[u8]) -> (Script, Script) {
        let unlocking = Script::build_signature_and_pubkey(signature, public_key);
        let locking = Script::build_p2pkh(&hash160(public_key));
        (unlocking, locking)
    }

    #[test]
    fn test_verify_p2pkh_accepts_matching_pair() {
        let checker = FixedChecker::new(&[0x30, 0x01], &[0x02; 33]);
        let (unlocking, locking) = p2pkh_pair(&[0x30, 0x01], &[0x02; 33]);
        assert!(verify_script(&unlocking, &locking, &checker).unwrap());
        assert_eq!(checker.calls.get(), 1);
    }

    #[test]
    fn test_verify_p2pkh_wrong_key_hash() {
        let checker = FixedChecker::new(&[0x30, 0x01], &[0x02; 33]);
        let unlocking = Script::build_signature_and_pubkey(&[0x30, 0x01], &[0x02; 33]);
        let locking = Script::build_p2pkh(&[0u8; 20]);
        assert!(!verify_script(&unlocking, &locking, &checker).unwrap());
        // EQUALVERIFY stops execution before the signature check
        assert_eq!(checker.calls.get(), 0);
    }

    #[test]
    fn test_verify_p2pkh_bad_signature() {
        let checker = FixedChecker::new(&[0x30, 0x01], &[0x02; 33]);
        let (unlocking, locking) = p2pkh_pair(&[0x30, 0x02], &[0x02; 33]);
        assert!(!verify_script(&unlocking, &locking, &checker).unwrap());
    }

    #[test]
    fn test_checker_error_propagates() {
        let checker = FixedChecker::new(&[0x30], &[0x02; 33]);
        let (unlocking, locking) = p2pkh_pair(&[], &[0x02; 33]);
        assert!(verify_script(&unlocking, &locking, &checker).is_err());
    }

    #[test]
    fn test_non_push_unlocking_rejected() {
        let checker = FixedChecker::new(&[0x30], &[0x02; 33]);
        let unlocking = Script::from_bytes(vec![0x01, 0x30, OP_DUP]);
        let locking = Script::build_p2pkh(&[0u8; 20]);
        assert!(matches!(
            verify_script(&unlocking, &locking, &checker),
            Err(SigningError::ScriptShape(_))
        ));
    }

    #[test]
    fn test_empty_stack_operations_fail() {
        let checker = FixedChecker::new(&[0x30], &[0x02; 33]);
        for op in [OP_DUP, OP_EQUAL, OP_CHECKSIG] {
            let mut stack = Vec::new();
            let script = Script::from_bytes(vec![op]);
            assert!(!eval_script(&script, &mut stack, &checker).unwrap());
        }
    }

    #[test]
    fn test_equal_pushes_result() {
        let checker = FixedChecker::new(&[0x30], &[0x02; 33]);
        let script = Script::from_bytes(vec![0x01, 0x07, 0x01, 0x07, OP_EQUAL]);
        let mut stack = Vec::new();
        assert!(eval_script(&script, &mut stack, &checker).unwrap());
        assert_eq!(stack, vec![vec![1]]);

        let script = Script::from_bytes(vec![0x01, 0x07, 0x01, 0x08, OP_EQUAL]);
        let mut stack = Vec::new();
        assert!(eval_script(&script, &mut stack, &checker).unwrap());
        assert_eq!(stack, vec![Vec::<u8>::new()]);
        assert!(!verify_script(&Script::new(), &script, &checker).unwrap());
    }

    #[test]
    fn test_unsupported_opcode() {
        let checker = FixedChecker::new(&[0x30], &[0x02; 33]);
        let mut stack = Vec::new();
        let script = Script::from_bytes(vec![0x61]);
        assert!(eval_script(&script, &mut stack, &checker).is_err());
    }

    #[test]
    fn test_limits() {
        let checker = FixedChecker::new(&[0x30], &[0x02; 33]);

        let oversized = Script::from_elements(&[ScriptElement::Push(vec![0; 521])]);
        assert!(eval_script(&oversized, &mut Vec::new(), &checker).is_err());

        let too_long = Script::from_bytes(vec![OP_DUP; MAX_SCRIPT_SIZE + 1]);
        assert!(eval_script(&too_long, &mut vec![vec![1]], &checker).is_err());

        let mut pushes = vec![0x01, 0x01];
        pushes.extend(std::iter::repeat(OP_DUP).take(MAX_STACK_SIZE));
        let deep = Script::from_bytes(pushes);
        assert!(eval_script(&deep, &mut Vec::new(), &checker).is_err());
    }

    #[test]
    fn test_cast_to_bool() {
        assert!(!cast_to_bool(&[]));
        assert!(!cast_to_bool(&[0, 0]));
        assert!(!cast_to_bool(&[0, 0x80]));
        assert!(cast_to_bool(&[1]));
        assert!(cast_to_bool(&[0x80, 0]));
    }
}
