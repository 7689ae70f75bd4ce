use super::Value;

/// MessagePack writer, always picking the shortest encoding.
#[derive(Debug, Default)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        self.bytes.extend_from_slice(value);
    }

    pub fn write_nil(&mut self) {
        self.write_u8(0xc0);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(if value { 0xc3 } else { 0xc2 });
    }

    pub fn write_uint(&mut self, value: u64) {
        if value < 0x80 {
            self.write_u8(value as u8);
        } else if value <= u8::MAX as u64 {
            self.write_u8(0xcc);
            self.write_u8(value as u8);
        } else if value <= u16::MAX as u64 {
            self.write_u8(0xcd);
            self.write_bytes(&(value as u16).to_be_bytes());
        } else if value <= u32::MAX as u64 {
            self.write_u8(0xce);
            self.write_bytes(&(value as u32).to_be_bytes());
        } else {
            self.write_u8(0xcf);
            self.write_bytes(&value.to_be_bytes());
        }
    }

    pub fn write_str(&mut self, value: &str) {
        let len = value.len();
        if len < 32 {
            self.write_u8(0xa0 | len as u8);
        } else if len <= u8::MAX as usize {
            self.write_u8(0xd9);
            self.write_u8(len as u8);
        } else if len <= u16::MAX as usize {
            self.write_u8(0xda);
            self.write_bytes(&(len as u16).to_be_bytes());
        } else {
            self.write_u8(0xdb);
            self.write_bytes(&(len as u32).to_be_bytes());
        }
        self.write_bytes(value.as_bytes());
    }

    pub fn write_bin(&mut self, value: &[u8]) {
        let len = value.len();
        if len <= u8::MAX as usize {
            self.write_u8(0xc4);
            self.write_u8(len as u8);
        } else if len <= u16::MAX as usize {
            self.write_u8(0xc5);
            self.write_bytes(&(len as u16).to_be_bytes());
        } else {
            self.write_u8(0xc6);
            self.write_bytes(&(len as u32).to_be_bytes());
        }
        self.write_bytes(value);
    }

    fn write_container_header(&mut self, len: usize, fix: u8, marker16: u8, marker32: u8) {
        if len < 16 {
            self.write_u8(fix | len as u8);
        } else if len <= u16::MAX as usize {
            self.write_u8(marker16);
            self.write_bytes(&(len as u16).to_be_bytes());
        } else {
            self.write_u8(marker32);
            self.write_bytes(&(len as u32).to_be_bytes());
        }
    }

    pub fn write_value(&mut self, value: &Value) {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(value) => self.write_bool(*value),
            Value::Uint(value) => self.write_uint(*value),
            Value::Str(value) => self.write_str(value),
            Value::Bytes(value) => self.write_bin(value),
            Value::Array(values) => {
                self.write_container_header(values.len(), 0x90, 0xdc, 0xdd);
                for value in values {
                    self.write_value(value);
                }
            }
            Value::Map(entries) => {
                self.write_container_header(entries.len(), 0x80, 0xde, 0xdf);
                for (key, value) in entries {
                    self.write_str(key);
                    self.write_value(value);
                }
            }
        }
    }

    pub fn bytes(self) -> Vec<u8> {
        self.bytes
    }
}
