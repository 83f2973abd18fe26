use crate::charset;
use crate::core_api::{CoreError, PlayTime};
use crate::gender::Gender;
use crate::reader::{put_u16, put_u32, u16_at, u32_at};

pub const TRAINER_NAME_LEN: usize = 7;
pub const MAX_MONEY: u32 = 999_999;
pub const MAX_COINS: u16 = 9_999;

const NAME_OFFSET: usize = 0x00;
const GENDER_OFFSET: usize = 0x08;
const TRAINER_ID_OFFSET: usize = 0x0A;
const HOURS_OFFSET: usize = 0x0E;
const MINUTES_OFFSET: usize = 0x10;
const SECONDS_OFFSET: usize = 0x11;
const FRAMES_OFFSET: usize = 0x12;
const SECURITY_KEY_OFFSET: usize = 0xF20;

const MONEY_OFFSET: usize = 0x290;
const COINS_OFFSET: usize = 0x294;

/// Trainer block at the start of section 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerInfo {
    name: [u8; TRAINER_NAME_LEN],
    gender: Gender,
    trainer_id: u32,
    play_time: PlayTime,
    security_key: u32,
}

impl TrainerInfo {
    pub fn parse(section0: &[u8]) -> Result<Self, CoreError> {
        if section0.len() < SECURITY_KEY_OFFSET + 4 {
            return Err(CoreError::size(
                "trainer section",
                SECURITY_KEY_OFFSET + 4,
                section0.len(),
            ));
        }

        let mut name = [0u8; TRAINER_NAME_LEN];
        name.copy_from_slice(&section0[NAME_OFFSET..NAME_OFFSET + TRAINER_NAME_LEN]);

        Ok(Self {
            name,
            gender: Gender::from_raw(section0[GENDER_OFFSET]),
            trainer_id: u32_at(section0, TRAINER_ID_OFFSET),
            play_time: PlayTime {
                hours: u16_at(section0, HOURS_OFFSET),
                minutes: section0[MINUTES_OFFSET],
                seconds: section0[SECONDS_OFFSET],
                frames: section0[FRAMES_OFFSET],
            },
            security_key: u32_at(section0, SECURITY_KEY_OFFSET),
        })
    }

    /// Write the editable fields back; the security key is never rewritten.
    pub fn write(&self, section0: &mut [u8]) {
        section0[NAME_OFFSET..NAME_OFFSET + TRAINER_NAME_LEN].copy_from_slice(&self.name);
        section0[GENDER_OFFSET] = self.gender.raw();
        put_u32(section0, TRAINER_ID_OFFSET, self.trainer_id);
        put_u16(section0, HOURS_OFFSET, self.play_time.hours);
        section0[MINUTES_OFFSET] = self.play_time.minutes;
        section0[SECONDS_OFFSET] = self.play_time.seconds;
        section0[FRAMES_OFFSET] = self.play_time.frames;
    }

    pub fn name(&self) -> String {
        charset::decode(&self.name)
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), CoreError> {
        self.name = charset::encode_fixed::<TRAINER_NAME_LEN>(name)?;
        Ok(())
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn trainer_id(&self) -> u32 {
        self.trainer_id
    }

    pub fn public_id(&self) -> u16 {
        (self.trainer_id & 0xFFFF) as u16
    }

    pub fn secret_id(&self) -> u16 {
        (self.trainer_id >> 16) as u16
    }

    pub fn play_time(&self) -> PlayTime {
        self.play_time
    }

    pub fn security_key(&self) -> u32 {
        self.security_key
    }
}

/// Money and game-corner coins, stored XOR-masked with the security key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wallet {
    money: u32,
    coins: u16,
}

impl Wallet {
    pub fn parse(section1: &[u8], key: u32) -> Result<Self, CoreError> {
        if section1.len() < COINS_OFFSET + 2 {
            return Err(CoreError::size("wallet section", COINS_OFFSET + 2, section1.len()));
        }
        Ok(Self {
            money: u32_at(section1, MONEY_OFFSET) ^ key,
            coins: u16_at(section1, COINS_OFFSET) ^ (key & 0xFFFF) as u16,
        })
    }

    pub fn write(&self, section1: &mut [u8], key: u32) {
        put_u32(section1, MONEY_OFFSET, self.money ^ key);
        put_u16(section1, COINS_OFFSET, self.coins ^ (key & 0xFFFF) as u16);
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn coins(&self) -> u16 {
        self.coins
    }

    pub fn set_money(&mut self, money: u32) -> Result<(), CoreError> {
        if money > MAX_MONEY {
            return Err(CoreError::invalid_argument(format!(
                "money {money} exceeds {MAX_MONEY}"
            )));
        }
        self.money = money;
        Ok(())
    }

    pub fn set_coins(&mut self, coins: u16) -> Result<(), CoreError> {
        if coins > MAX_COINS {
            return Err(CoreError::invalid_argument(format!(
                "coins {coins} exceed {MAX_COINS}"
            )));
        }
        self.coins = coins;
        Ok(())
    }
}
